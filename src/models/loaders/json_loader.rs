use crate::error::{AppError, AppResult, FileError};
use crate::models::corpus::{CorpusFile, QuestionCorpus};
use std::path::Path;
use tokio::fs;

/// 从 JSON 文件加载单个真题索引
pub async fn load_corpus_file(path: &Path) -> AppResult<CorpusFile> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let file: CorpusFile =
        serde_json::from_str(&content).map_err(|source| FileError::JsonParseFailed {
            path: path.display().to_string(),
            source,
        })?;

    Ok(file)
}

/// 按顺序加载并合并所有真题索引文件
///
/// 缺失或无法解析的文件只记录警告并跳过，永远返回一个可用的（可能为空的）题库。
pub async fn load_corpus<P: AsRef<Path>>(paths: &[P]) -> QuestionCorpus {
    let mut corpus = QuestionCorpus::default();

    for path in paths {
        let path = path.as_ref();
        tracing::info!("正在加载: {}", path.display());

        match load_corpus_file(path).await {
            Ok(file) => {
                tracing::info!("成功加载 {} 个题目", file.questions.len());
                corpus.merge(file);
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("⚠️ {} not found.", path.display());
                corpus.record_skipped(path.display().to_string());
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                corpus.record_skipped(path.display().to_string());
            }
        }
    }

    corpus
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_index(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let present = write_index(
            dir.path(),
            "exam-index1.json",
            r#"{"questions": [{"questionNumber": 1, "topics": ["Algebra"]}, {"questionNumber": 2, "topics": ["Calculus"]}], "topics": ["Algebra", "Calculus"]}"#,
        );
        let absent = dir.path().join("exam-index2.json");

        let corpus = tokio_test::block_on(load_corpus(&[present, absent.clone()]));

        assert_eq!(corpus.total_questions(), 2);
        assert_eq!(corpus.skipped_sources(), &[absent.display().to_string()]);
    }

    #[test]
    fn test_unparsable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let broken = write_index(dir.path(), "broken.json", "{ not json");
        let good = write_index(
            dir.path(),
            "good.json",
            r#"{"questions": [{"questionNumber": "4"}], "topics": []}"#,
        );

        let corpus = tokio_test::block_on(load_corpus(&[broken, good]));

        assert_eq!(corpus.total_questions(), 1);
        assert_eq!(corpus.skipped_sources().len(), 1);
    }

    #[test]
    fn test_numeric_paper_field_keeps_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let index = write_index(
            dir.path(),
            "exam-index3.json",
            r#"{"questions": [{"questionNumber": 1, "paper": {"year": 2020, "paper": 1}}, {"questionNumber": 2, "paper": {"year": "2020", "paper": "Paper 2"}}], "topics": []}"#,
        );

        let corpus = tokio_test::block_on(load_corpus(&[index]));

        assert_eq!(corpus.total_questions(), 2);
        assert!(corpus.skipped_sources().is_empty());
    }

    #[test]
    fn test_no_files_gives_empty_corpus() {
        let paths: [&Path; 0] = [];
        let corpus = tokio_test::block_on(load_corpus(&paths));
        assert!(corpus.is_empty());
        assert!(corpus.skipped_sources().is_empty());
    }

    #[tokio::test]
    async fn test_load_corpus_file_reports_not_found() {
        let err = load_corpus_file(Path::new("does/not/exist.json"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
