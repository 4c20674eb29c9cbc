use crate::models::question::CorpusQuestion;
use serde::Deserialize;
use std::collections::BTreeSet;

/// 单个真题索引文件的内容
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorpusFile {
    #[serde(default)]
    pub questions: Vec<CorpusQuestion>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// 合并后的真题库
///
/// 启动时加载一次，之后只读。
#[derive(Debug, Clone, Default)]
pub struct QuestionCorpus {
    questions: Vec<CorpusQuestion>,
    topics: BTreeSet<String>,
    skipped_sources: Vec<String>,
}

impl QuestionCorpus {
    /// 按顺序合并多个索引文件
    pub fn from_files(files: impl IntoIterator<Item = CorpusFile>) -> Self {
        let mut corpus = Self::default();
        for file in files {
            corpus.merge(file);
        }
        corpus
    }

    pub(crate) fn merge(&mut self, file: CorpusFile) {
        self.questions
            .extend(file.questions.into_iter().map(clean_question));
        self.topics.extend(
            file.topics
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        );
    }

    pub(crate) fn record_skipped(&mut self, source: impl Into<String>) {
        self.skipped_sources.push(source.into());
    }

    /// 按加载顺序排列的题目
    pub fn questions(&self) -> &[CorpusQuestion] {
        &self.questions
    }

    /// 已排序的全部主题标签
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(String::as_str)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 加载时被跳过的文件
    pub fn skipped_sources(&self) -> &[String] {
        &self.skipped_sources
    }
}

// 空白主题标签没有匹配意义，加载时丢弃
fn clean_question(mut question: CorpusQuestion) -> CorpusQuestion {
    question.topics = question
        .topics
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    question
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(json: &str) -> CorpusFile {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_merge_concatenates_and_unions() {
        let a = file(
            r#"{"questions": [{"questionNumber": 1}], "topics": ["Algebra", "Calculus"]}"#,
        );
        let b = file(
            r#"{"questions": [{"questionNumber": 2}, {"questionNumber": 3}], "topics": ["Calculus", "Statistics"]}"#,
        );
        let corpus = QuestionCorpus::from_files([a, b]);

        assert_eq!(corpus.total_questions(), 3);
        let ids: Vec<_> = corpus.questions().iter().map(|q| q.number_label()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        let topics: Vec<_> = corpus.topics().collect();
        assert_eq!(topics, vec!["Algebra", "Calculus", "Statistics"]);
    }

    #[test]
    fn test_blank_topic_tags_are_dropped() {
        let corpus = QuestionCorpus::from_files([file(
            r#"{"questions": [{"topics": ["", "  ", " Probability "]}], "topics": [""]}"#,
        )]);
        assert_eq!(corpus.questions()[0].topics, vec!["Probability".to_string()]);
        assert_eq!(corpus.topic_count(), 0);
    }

    #[test]
    fn test_missing_keys_give_empty_file() {
        let corpus = QuestionCorpus::from_files([file("{}")]);
        assert!(corpus.is_empty());
    }
}
