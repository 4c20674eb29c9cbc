//! 真题浏览
//!
//! 按主题列出真题，分 Easy / Medium / Hard 三栏；每道题带一个唯一的触发键，
//! 用于"生成相似题"。

use std::collections::HashSet;
use std::fmt::Display;

use crate::models::question::PLACEHOLDER;
use crate::models::{CorpusQuestion, Difficulty, QuestionCorpus};
use crate::services::topic_matcher::DifficultyBuckets;

/// 列表摘要中描述的最大长度
const SUMMARY_LEN: usize = 60;

/// 为题库中的每道题生成触发键：`past_<年份>_<试卷>_<题号>`
///
/// 键已被占用时依次追加 `_2`、`_3`，直到得到未使用的键，保证键唯一。
pub fn trigger_keys(corpus: &QuestionCorpus) -> Vec<String> {
    let mut issued: HashSet<String> = HashSet::new();
    corpus
        .questions()
        .iter()
        .map(|q| {
            let base = base_key(q);
            let mut key = base.clone();
            let mut suffix = 1;
            while issued.contains(&key) {
                suffix += 1;
                key = format!("{base}_{suffix}");
            }
            issued.insert(key.clone());
            key
        })
        .collect()
}

fn base_key(q: &CorpusQuestion) -> String {
    let paper = q
        .paper
        .as_ref()
        .and_then(|p| p.paper.as_deref())
        .unwrap_or(PLACEHOLDER)
        .replace(' ', "");
    format!("past_{}_{}_{}", q.year_label(), paper, q.number_label())
}

/// 按触发键查找真题
pub fn find_by_key<'a>(corpus: &'a QuestionCorpus, key: &str) -> Option<&'a CorpusQuestion> {
    trigger_keys(corpus)
        .iter()
        .position(|k| k == key)
        .map(|i| &corpus.questions()[i])
}

/// 列表中的一道真题
#[derive(Debug, Clone)]
pub struct PastPaperEntry<'a> {
    pub key: String,
    pub question: &'a CorpusQuestion,
}

impl PastPaperEntry<'_> {
    /// 折叠标题：`Q<题号> - <描述前 60 字>...`
    pub fn summary(&self) -> String {
        let description = self
            .question
            .description
            .as_deref()
            .unwrap_or("No description");
        let preview: String = description.chars().take(SUMMARY_LEN).collect();
        format!("Q{} - {}...", self.question.number_label(), preview)
    }
}

impl Display for PastPaperEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let q = self.question;
        writeln!(f, "{}", self.summary())?;
        writeln!(f, "  Question:    {}", q.number_label())?;
        writeln!(f, "  Paper:       {} {}", q.year_label(), q.paper_label())?;
        writeln!(f, "  Topics:      {}", q.topics_joined())?;
        writeln!(f, "  Difficulty:  {}", q.difficulty_label())?;
        writeln!(f, "  Concepts:    {}", q.concepts_joined())?;
        writeln!(
            f,
            "  Description: {}",
            q.description.as_deref().unwrap_or("No description available")
        )?;
        write!(f, "  Similar key: {}", self.key)
    }
}

/// 一个难度分栏
#[derive(Debug, Clone)]
pub struct DifficultyTab<'a> {
    pub difficulty: Difficulty,
    pub entries: Vec<PastPaperEntry<'a>>,
}

impl DifficultyTab<'_> {
    /// 分栏标题，例如 `Easy (3)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.difficulty, self.entries.len())
    }
}

/// 浏览结果
#[derive(Debug, Clone)]
pub enum BrowseView<'a> {
    /// 真题库为空
    CorpusUnavailable,
    /// 该主题没有真题
    NoResults { topic: String },
    /// 按难度分栏的结果
    Results {
        topic: String,
        total: usize,
        tabs: Vec<DifficultyTab<'a>>,
    },
}

/// 浏览某个主题下的全部真题
pub fn browse<'a>(corpus: &'a QuestionCorpus, topic: &str) -> BrowseView<'a> {
    if corpus.is_empty() {
        return BrowseView::CorpusUnavailable;
    }

    let entries: Vec<PastPaperEntry<'a>> = corpus
        .questions()
        .iter()
        .zip(trigger_keys(corpus))
        .filter(|(q, _)| q.has_topic_like(topic))
        .map(|(question, key)| PastPaperEntry { key, question })
        .collect();

    if entries.is_empty() {
        return BrowseView::NoResults {
            topic: topic.to_string(),
        };
    }

    let total = entries.len();
    let tabs = DifficultyBuckets::partition(entries, |e| e.question.difficulty.as_deref())
        .into_parts()
        .into_iter()
        .map(|(difficulty, entries)| DifficultyTab {
            difficulty,
            entries,
        })
        .collect();

    tracing::debug!("浏览 {}: 找到 {} 道真题", topic, total);

    BrowseView::Results {
        topic: topic.to_string(),
        total,
        tabs,
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

    fn sample() -> QuestionCorpus {
        corpus(
            r#"{"questions": [
                {"questionNumber": 4, "description": "Find the equation of the tangent to the circle at the given point on it", "topics": ["Geometry of the Circle"], "difficulty": "Hard", "concepts": ["tangent", "slope"], "paper": {"year": 2019, "paper": "Paper 2"}},
                {"questionNumber": 5, "description": "Circle through three points", "topics": ["Geometry of the Circle"], "difficulty": "Hard", "paper": {"year": 2019, "paper": "Paper 2"}},
                {"questionNumber": 1, "description": "Slope of a line", "topics": ["Geometry of the Line"], "difficulty": "Easy", "paper": {"year": 2020, "paper": "Paper 2"}},
                {"questionNumber": 2, "topics": ["Geometry of the Circle"], "difficulty": "Easy"}
            ]}"#,
        )
    }

    #[test]
    fn test_same_paper_different_ids_distinct_keys() {
        let keys = trigger_keys(&sample());
        assert_eq!(keys[0], "past_2019_Paper2_4");
        assert_eq!(keys[1], "past_2019_Paper2_5");
        assert_ne!(keys[0], keys[1]);
        assert_eq!(keys[3], "past_N/A_N/A_2");
    }

    #[test]
    fn test_exact_duplicates_get_suffix() {
        let corpus = corpus(
            r#"{"questions": [
                {"questionNumber": 1, "paper": {"year": 2018, "paper": "Paper 1"}},
                {"questionNumber": 1, "paper": {"year": 2018, "paper": "Paper 1"}}
            ]}"#,
        );
        let keys = trigger_keys(&corpus);
        assert_eq!(keys, vec!["past_2018_Paper1_1", "past_2018_Paper1_1_2"]);
        assert!(std::ptr::eq(
            find_by_key(&corpus, "past_2018_Paper1_1_2").unwrap(),
            &corpus.questions()[1]
        ));
    }

    #[test]
    fn test_suffix_never_reuses_an_existing_key() {
        let corpus = corpus(
            r#"{"questions": [
                {"questionNumber": 1, "paper": {"year": 2018, "paper": "Paper 1"}},
                {"questionNumber": 1, "paper": {"year": 2018, "paper": "Paper 1"}},
                {"questionNumber": "1_2", "paper": {"year": 2018, "paper": "Paper 1"}}
            ]}"#,
        );
        let keys = trigger_keys(&corpus);
        assert_eq!(
            keys,
            vec!["past_2018_Paper1_1", "past_2018_Paper1_1_2", "past_2018_Paper1_1_2_2"]
        );
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
        assert!(std::ptr::eq(
            find_by_key(&corpus, "past_2018_Paper1_1_2_2").unwrap(),
            &corpus.questions()[2]
        ));
    }

    #[test]
    fn test_browse_groups_into_tabs() {
        let corpus = sample();
        match browse(&corpus, "circle") {
            BrowseView::Results { total, tabs, .. } => {
                assert_eq!(total, 3);
                let labels: Vec<_> = tabs.iter().map(|t| t.label()).collect();
                assert_eq!(labels, vec!["Easy (1)", "Medium (0)", "Hard (2)"]);
                assert_eq!(tabs[2].entries[1].key, "past_2019_Paper2_5");
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn test_browse_degrades_without_data() {
        assert!(matches!(
            browse(&QuestionCorpus::default(), "Algebra"),
            BrowseView::CorpusUnavailable
        ));
        assert!(matches!(
            browse(&sample(), "Statistics"),
            BrowseView::NoResults { .. }
        ));
    }

    #[test]
    fn test_summary_truncates_description() {
        let corpus = sample();
        let entry = PastPaperEntry {
            key: "k".to_string(),
            question: &corpus.questions()[0],
        };
        let summary = entry.summary();
        assert!(summary.starts_with("Q4 - Find the equation"));
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), "Q4 - ".len() + 60 + 3);
        assert!(entry.to_string().contains("Concepts:    tangent, slope"));
    }
}
