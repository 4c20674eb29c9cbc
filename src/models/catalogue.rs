//! 固定的主题与子主题目录

use phf::phf_map;

/// 可选主题（按界面显示顺序）
pub const TOPICS: [&str; 8] = [
    "Probability",
    "Trigonometry",
    "Algebra",
    "Geometry of the Circle",
    "Geometry of the Line",
    "Statistics",
    "Enlargements",
    "Calculus",
];

const PROBABILITY: &[&str] = &[
    "Combined events",
    "Conditional probability",
    "Expected value",
    "Permutations and combinations",
    "Binomial distribution",
    "Bernoulli Trials",
    "Normal Distribution",
];

const TRIGONOMETRY: &[&str] = &[
    "Trigonometric identities",
    "Graphs",
    "Radians",
    "Sine rule / Cosine rule",
    "Unit Circle",
    "Pythagoras Theorem",
    "Angles of Elevation and Depression",
    "Reference Angles",
    "Trigonometric Equations",
    "Trigonometric Functions",
];

const ALGEBRA: &[&str] = &[
    "Quadratics",
    "Functions",
    "Logs",
    "Sequences & series",
    "Inequalities",
    "Sum and Difference of 2 Cubes",
    "Algebraic Fractions",
    "Simultaneous Equations in 2 Variables",
    "Simultaneous Equations in 3 Variables",
    "Simultaneous Equations with linear and non-linear Equations",
    "Manipulation of Formulae",
    "Surds",
];

const CIRCLE: &[&str] = &[
    "Center (0,0) and radius r",
    "Center (h,k) and radius r",
    "Equations of the form x^2 + y^2 + 2gx + 2fy + c = 0",
    "Points outside, inside or on the Circle",
    "Intersection of a Line and Circle",
    "Equation of Tangent to a point on the Circle",
    "Equation of Tangents from point outside the Circle",
    "Touching Circles",
    "Problems in g, f and c",
];

const LINE: &[&str] = &[
    "Area of a Triangle",
    "Perpendicular Distance from a point to a Line",
    "Angle between 2 Lines",
];

const STATISTICS: &[&str] = &[
    "Scatter Graphs",
    "Correlation Coefficient",
    "Mean, Mode, Median",
    "Range, Quartiles and Interquartile Range",
    "Standard Deviation",
    "z-scores",
    "Empirical Rule",
    "Central Limit Theorem",
    "Confidence Interval",
    "Hypothesis Testing",
];

const ENLARGEMENTS: &[&str] = &["Translation", "Central Symmetry", "Rotations", "Enlargement"];

const CALCULUS: &[&str] = &[
    "Differentiation",
    "Integration",
    "Rates of change",
    "Area under curves",
    "Product/Quotient/Chain rule",
];

static SUBTOPICS: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "Probability" => PROBABILITY,
    "Trigonometry" => TRIGONOMETRY,
    "Algebra" => ALGEBRA,
    "Geometry of the Circle" => CIRCLE,
    "Geometry of the Line" => LINE,
    "Statistics" => STATISTICS,
    "Enlargements" => ENLARGEMENTS,
    "Calculus" => CALCULUS,
};

/// 主题对应的子主题，未知主题返回空
pub fn subtopics_for(topic: &str) -> &'static [&'static str] {
    SUBTOPICS.get(topic).copied().unwrap_or(&[])
}

/// 忽略大小写查找主题的标准写法
pub fn find_topic(topic: &str) -> Option<&'static str> {
    TOPICS
        .iter()
        .copied()
        .find(|t| t.eq_ignore_ascii_case(topic.trim()))
}

/// 在主题范围内忽略大小写查找子主题的标准写法
pub fn find_subtopic(topic: &str, subtopic: &str) -> Option<&'static str> {
    subtopics_for(topic)
        .iter()
        .copied()
        .find(|s| s.eq_ignore_ascii_case(subtopic.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_topic_has_subtopics() {
        for topic in TOPICS {
            assert!(!subtopics_for(topic).is_empty(), "{topic}");
        }
        assert_eq!(SUBTOPICS.len(), TOPICS.len());
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(find_topic("calculus"), Some("Calculus"));
        assert_eq!(find_subtopic("Calculus", "integration"), Some("Integration"));
        assert_eq!(find_subtopic("Calculus", "Surds"), None);
        assert!(subtopics_for("Topology").is_empty());
    }
}
