//! 真题匹配服务 - 业务能力层
//!
//! 按主题（子串、忽略大小写）和难度从真题库中挑题。主题采用子串匹配，
//! "Line" 也会命中包含 "Line" 的其他标签，这一行为保持不变。

use crate::models::{CorpusQuestion, Difficulty, QuestionCorpus};

/// 作为出题风格参考的真题数量上限
pub const MAX_STYLE_REFERENCES: usize = 5;

/// 返回全部匹配的真题，保持题库中的顺序
///
/// # 参数
/// - `topic`: 主题，任一标签包含它（忽略大小写）即算匹配
/// - `difficulty`: 难度过滤（可选），忽略大小写完全相等
pub fn find_matches<'a>(
    corpus: &'a QuestionCorpus,
    topic: &str,
    difficulty: Option<&str>,
) -> Vec<&'a CorpusQuestion> {
    corpus
        .questions()
        .iter()
        .filter(|q| q.has_topic_like(topic))
        .filter(|q| difficulty.map_or(true, |d| q.has_difficulty(d)))
        .collect()
}

/// 挑选最多 5 道风格参考题
pub fn style_references<'a>(
    corpus: &'a QuestionCorpus,
    topic: &str,
    difficulty: Option<&str>,
) -> Vec<&'a CorpusQuestion> {
    let mut matches = find_matches(corpus, topic, difficulty);
    matches.truncate(MAX_STYLE_REFERENCES);
    matches
}

/// 按难度分组的匹配结果
#[derive(Debug)]
pub struct DifficultyBuckets<T> {
    pub easy: Vec<T>,
    pub medium: Vec<T>,
    pub hard: Vec<T>,
}

impl<T> DifficultyBuckets<T> {
    /// 分入 Easy / Medium / Hard 三组（忽略大小写）；其他难度标签不进入任何一组
    pub fn partition<I, F>(items: I, label: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Option<&str>,
    {
        let mut buckets = Self {
            easy: Vec::new(),
            medium: Vec::new(),
            hard: Vec::new(),
        };
        for item in items {
            match label(&item).and_then(Difficulty::parse) {
                Some(Difficulty::Easy) => buckets.easy.push(item),
                Some(Difficulty::Medium) => buckets.medium.push(item),
                Some(Difficulty::Hard) => buckets.hard.push(item),
                None => {}
            }
        }
        buckets
    }

    /// 按 Easy、Medium、Hard 顺序拆出三组
    pub fn into_parts(self) -> [(Difficulty, Vec<T>); 3] {
        [
            (Difficulty::Easy, self.easy),
            (Difficulty::Medium, self.medium),
            (Difficulty::Hard, self.hard),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CorpusFile;

    fn corpus(json: &str) -> QuestionCorpus {
        let file: CorpusFile = serde_json::from_str(json).unwrap();
        QuestionCorpus::from_files([file])
    }

    fn mixed_corpus() -> QuestionCorpus {
        corpus(
            r#"{"questions": [
                {"questionNumber": 1, "topics": ["Algebra"], "difficulty": "Easy"},
                {"questionNumber": 2, "topics": ["Calculus", "Algebra — Quadratics"], "difficulty": "hard"},
                {"questionNumber": 3, "topics": ["Geometry of the Line"], "difficulty": "Medium"},
                {"questionNumber": 4, "topics": ["ALGEBRA"], "difficulty": "Medium"},
                {"questionNumber": 5, "topics": ["Algebra"], "difficulty": "Unknown"}
            ], "topics": []}"#,
        )
    }

    #[test]
    fn test_single_entry_lowercase_query() {
        let corpus = corpus(
            r#"{"questions": [{"questionNumber": "7", "topics": ["Algebra"], "difficulty": "Easy"}], "topics": ["Algebra"]}"#,
        );
        let found = find_matches(&corpus, "algebra", Some("Easy"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number_label(), "7");
    }

    #[test]
    fn test_matches_obey_topic_and_difficulty() {
        let corpus = mixed_corpus();
        for (topic, difficulty) in [("algebra", "medium"), ("Algebra", "HARD"), ("line", "Medium")] {
            for q in find_matches(&corpus, topic, Some(difficulty)) {
                assert!(q.has_topic_like(topic));
                assert!(q.difficulty_label().eq_ignore_ascii_case(difficulty));
            }
        }
        let ids: Vec<_> = find_matches(&corpus, "algebra", None)
            .iter()
            .map(|q| q.number_label())
            .collect();
        assert_eq!(ids, vec!["1", "2", "4", "5"]);
    }

    #[test]
    fn test_style_references_capped_at_five() {
        let questions: Vec<String> = (0..12)
            .map(|i| format!(r#"{{"questionNumber": {i}, "topics": ["Statistics"], "difficulty": "Easy"}}"#))
            .collect();
        let corpus = corpus(&format!(r#"{{"questions": [{}]}}"#, questions.join(",")));

        let refs = style_references(&corpus, "stat", None);
        assert_eq!(refs.len(), MAX_STYLE_REFERENCES);
        assert_eq!(refs[0].number_label(), "0");
        assert!(style_references(&corpus, "Probability", None).is_empty());
    }

    #[test]
    fn test_empty_corpus_yields_nothing() {
        let corpus = QuestionCorpus::default();
        assert!(style_references(&corpus, "Algebra", Some("Easy")).is_empty());
    }

    #[test]
    fn test_partition_into_three_buckets() {
        let corpus = mixed_corpus();
        let matches = find_matches(&corpus, "algebra", None);
        let buckets = DifficultyBuckets::partition(matches, |q| q.difficulty.as_deref());

        assert_eq!(buckets.easy.len(), 1);
        assert_eq!(buckets.medium.len(), 1);
        assert_eq!(buckets.hard.len(), 1);
        assert_eq!(buckets.medium[0].number_label(), "4");
        let order: Vec<_> = buckets.into_parts().iter().map(|(d, _)| *d).collect();
        assert_eq!(order, Difficulty::ALL.to_vec());
    }
}
