use serde::{Deserialize, Serialize};

/// 缺失字段的显示占位符
pub const PLACEHOLDER: &str = "N/A";

/// 难度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// 按显示顺序排列的全部难度
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// 获取标准名称
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// 忽略大小写解析难度
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 真题所属试卷
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperRef {
    #[serde(default, deserialize_with = "deserialize_opt_text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_text")]
    pub paper: Option<String>,
}

/// 真题索引中的一道题
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusQuestion {
    #[serde(
        rename = "questionNumber",
        default,
        deserialize_with = "deserialize_opt_text"
    )]
    pub question_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub paper: Option<PaperRef>,
}

impl CorpusQuestion {
    /// 题号，缺失时为 "N/A"
    pub fn number_label(&self) -> &str {
        self.question_number.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn description_label(&self) -> &str {
        self.description.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn difficulty_label(&self) -> &str {
        self.difficulty.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn year_label(&self) -> &str {
        self.paper
            .as_ref()
            .and_then(|p| p.year.as_deref())
            .unwrap_or(PLACEHOLDER)
    }

    /// 试卷名称，缺失时为空串
    pub fn paper_label(&self) -> &str {
        self.paper
            .as_ref()
            .and_then(|p| p.paper.as_deref())
            .unwrap_or("")
    }

    pub fn topics_joined(&self) -> String {
        self.topics.join(", ")
    }

    pub fn concepts_joined(&self) -> String {
        self.concepts.join(", ")
    }

    /// 是否有主题标签包含 `topic`（忽略大小写的子串匹配）
    pub fn has_topic_like(&self, topic: &str) -> bool {
        let needle = topic.to_lowercase();
        self.topics
            .iter()
            .any(|t| t.to_lowercase().contains(&needle))
    }

    /// 难度标签是否与 `difficulty` 相同（忽略大小写）
    pub fn has_difficulty(&self, difficulty: &str) -> bool {
        self.difficulty
            .as_deref()
            .is_some_and(|d| d.to_lowercase() == difficulty.to_lowercase())
    }
}

// 题号和年份在不同的索引文件中既可能是字符串也可能是整数
fn deserialize_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, an integer or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_ids_both_parse() {
        let q: CorpusQuestion = serde_json::from_str(
            r#"{"questionNumber": 7, "topics": ["Algebra"], "paper": {"year": "2019", "paper": "Paper 1"}}"#,
        )
        .unwrap();
        assert_eq!(q.number_label(), "7");
        assert_eq!(q.year_label(), "2019");

        let q: CorpusQuestion = serde_json::from_str(
            r#"{"questionNumber": "3(b)", "paper": {"year": 2021}}"#,
        )
        .unwrap();
        assert_eq!(q.number_label(), "3(b)");
        assert_eq!(q.year_label(), "2021");
        assert_eq!(q.paper_label(), "");
    }

    #[test]
    fn test_numeric_paper_number_parses() {
        let q: CorpusQuestion = serde_json::from_str(
            r#"{"questionNumber": 3, "paper": {"year": 2020, "paper": 1}}"#,
        )
        .unwrap();
        assert_eq!(q.paper_label(), "1");
        assert_eq!(q.year_label(), "2020");

        let q: CorpusQuestion =
            serde_json::from_str(r#"{"questionNumber": 4, "paper": {"paper": null}}"#).unwrap();
        assert_eq!(q.paper_label(), "");
    }

    #[test]
    fn test_missing_fields_show_placeholder() {
        let q: CorpusQuestion = serde_json::from_str("{}").unwrap();
        assert_eq!(q.number_label(), PLACEHOLDER);
        assert_eq!(q.difficulty_label(), PLACEHOLDER);
        assert_eq!(q.year_label(), PLACEHOLDER);
        assert!(q.topics.is_empty());
    }

    #[test]
    fn test_topic_match_is_case_insensitive_substring() {
        let q = CorpusQuestion {
            topics: vec!["Algebra — Quadratics".to_string()],
            difficulty: Some("Hard".to_string()),
            ..Default::default()
        };
        assert!(q.has_topic_like("algebra"));
        assert!(q.has_topic_like("QUADRATICS"));
        assert!(!q.has_topic_like("Calculus"));
        assert!(q.has_difficulty("hard"));
        assert!(!q.has_difficulty("Easy"));
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse(" medium "), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("Extreme"), None);
    }
}
