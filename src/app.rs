//! 应用入口逻辑 - 编排层
//!
//! 加载配置和真题库，把命令行命令分派到会话。
//! 每次交互失败只影响这一次交互，交互式模式会继续等待下一条命令。

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use crate::cli::{Commands, Selection};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::catalogue::{self, TOPICS};
use crate::models::{load_corpus, Difficulty, QuestionCorpus, WorksheetMode};
use crate::services::{ExportBundle, LlmService, TextGenerator};
use crate::utils::logging::{log_corpus_status, log_startup};
use crate::workflow::{browse, BrowseView, Session};

/// 应用主结构
pub struct App {
    config: Config,
    corpus: QuestionCorpus,
}

impl App {
    /// 初始化应用：记录启动信息并加载真题库
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config.llm_provider.to_string(), &config.llm_model_name);

        let corpus = load_corpus(&config.corpus_files).await;
        log_corpus_status(
            corpus.total_questions(),
            corpus.topic_count(),
            corpus.skipped_sources(),
        );

        Ok(Self { config, corpus })
    }

    /// 执行一条命令
    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Topics => print_topics(),
            Commands::Worksheet {
                selection,
                difficulty,
                export,
            } => {
                self.generate_once(&selection, WorksheetMode::Difficulty(difficulty), export)
                    .await?
            }
            Commands::Balanced { selection, export } => {
                self.generate_once(&selection, WorksheetMode::Balanced, export)
                    .await?
            }
            Commands::ExamStyle { selection, export } => {
                self.generate_once(&selection, WorksheetMode::ExamStyle, export)
                    .await?
            }
            Commands::Browse { topic } => print_browse(&self.corpus, &topic),
            Commands::PastSimilar { key } => {
                let mut session = self.session()?;
                let question = session.similar_to_past_paper(&key).await?;
                println!("{question}");
            }
            Commands::Study { selection } => self.study(&selection).await?,
        }
        Ok(())
    }

    fn session(&self) -> AppResult<Session<'_, LlmService>> {
        let generator = LlmService::new(&self.config)?;
        Ok(Session::new(&self.corpus, generator))
    }

    async fn generate_once(&self, selection: &Selection, mode: WorksheetMode, export: bool) -> Result<()> {
        let mut session = self.session()?;
        session.select(&selection.topic, &selection.subtopics)?;

        let worksheet = session.generate(mode).await?;
        print_questions(&worksheet.questions);

        if export {
            let bundle = session.export().await?;
            let paths = write_bundle(Path::new(&self.config.export_dir), &bundle).await?;
            print_saved(&paths);
        }
        Ok(())
    }

    /// 交互式学习：逐行读取命令，直到 `quit` 或输入结束
    async fn study(&self, selection: &Selection) -> Result<()> {
        let mut session = self.session()?;
        session.select(&selection.topic, &selection.subtopics)?;
        info!("📚 进入学习模式: {}", session.topic());
        println!("{STUDY_HELP}");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();
        loop {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let Some(command) = parse_study_command(&line) else {
                if !line.trim().is_empty() {
                    println!("Unrecognised command. Type `help` for the list.");
                }
                continue;
            };
            if command == StudyCommand::Quit {
                break;
            }
            if let Err(e) = self.handle(&mut session, command).await {
                error!("❌ {}", e);
            }
        }

        info!("👋 学习模式结束");
        Ok(())
    }

    async fn handle<G: TextGenerator>(&self, session: &mut Session<'_, G>, command: StudyCommand) -> AppResult<()> {
        match command {
            StudyCommand::Select { topic, subtopics } => {
                session.select(&topic, &subtopics)?;
                println!("Topic: {}", session.topic());
                print_subtopics(session.topic(), session.subtopics());
            }
            StudyCommand::Generate(mode) => {
                let worksheet = session.generate(mode).await?;
                print_questions(&worksheet.questions);
            }
            StudyCommand::Show => match session.worksheet() {
                Some(worksheet) => print_questions(&worksheet.questions),
                None => println!("No worksheet yet. Try `medium`, `balanced` or `exam`."),
            },
            StudyCommand::Answer(number) => {
                let answer = session.show_answer(number).await?;
                println!("Answer {number}:\n{answer}");
            }
            StudyCommand::More(number) => {
                let similar = session.more_like_this(number).await?;
                println!("More like question {number}:\n{similar}");
            }
            StudyCommand::Browse(topic) => {
                let topic = topic.unwrap_or_else(|| session.topic().to_string());
                print_browse(&self.corpus, &topic);
            }
            StudyCommand::PastSimilar(key) => {
                let similar = session.similar_to_past_paper(&key).await?;
                println!("{similar}");
            }
            StudyCommand::Export => {
                let bundle = session.export().await?;
                let paths = write_bundle(Path::new(&self.config.export_dir), &bundle).await?;
                print_saved(&paths);
            }
            StudyCommand::Help => println!("{STUDY_HELP}"),
            StudyCommand::Quit => {}
        }
        Ok(())
    }
}

const STUDY_HELP: &str = "Commands:
  select <topic>[: sub1; sub2]   choose topic and subtopics
  easy | medium | hard           10 questions at that difficulty
  balanced                       one question per subtopic
  exam                           3 exam-style questions with marks
  show                           print the current worksheet
  answer <n>                     worked solution for question n
  more <n>                       a new question like question n
  browse [topic]                 past-paper questions by difficulty
  similar <key>                  a new question like a past-paper entry
  export                         write both .docx files
  help | quit";

/// 交互式命令
#[derive(Debug, Clone, PartialEq, Eq)]
enum StudyCommand {
    Select { topic: String, subtopics: Vec<String> },
    Generate(WorksheetMode),
    Show,
    Answer(usize),
    More(usize),
    Browse(Option<String>),
    PastSimilar(String),
    Export,
    Help,
    Quit,
}

fn parse_study_command(line: &str) -> Option<StudyCommand> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_ascii_lowercase().as_str() {
        "select" | "topic" if !rest.is_empty() => {
            let (topic, subtopics) = rest.split_once(':').unwrap_or((rest, ""));
            StudyCommand::Select {
                topic: topic.trim().to_string(),
                subtopics: subtopics
                    .split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            }
        }
        "balanced" => StudyCommand::Generate(WorksheetMode::Balanced),
        "exam" | "exam-style" => StudyCommand::Generate(WorksheetMode::ExamStyle),
        "show" => StudyCommand::Show,
        "answer" => StudyCommand::Answer(rest.parse().ok()?),
        "more" => StudyCommand::More(rest.parse().ok()?),
        "browse" => StudyCommand::Browse((!rest.is_empty()).then(|| rest.to_string())),
        "similar" if !rest.is_empty() => StudyCommand::PastSimilar(rest.to_string()),
        "export" => StudyCommand::Export,
        "help" | "?" => StudyCommand::Help,
        "quit" | "exit" | "q" => StudyCommand::Quit,
        other => StudyCommand::Generate(WorksheetMode::Difficulty(Difficulty::parse(other)?)),
    };
    Some(command)
}

/// 把导出的两份文档写入导出目录，按练习卷的主题命名，返回写入的路径
async fn write_bundle(dir: &Path, bundle: &ExportBundle) -> AppResult<[PathBuf; 2]> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::file_write_failed(dir.display().to_string(), e))?;

    let stem = file_stem(&bundle.topic);
    let questions_path = dir.join(format!("{stem}_Questions.docx"));
    let answers_path = dir.join(format!("{stem}_Questions_and_Answers.docx"));

    for (path, bytes) in [
        (&questions_path, &bundle.questions_only),
        (&answers_path, &bundle.with_answers),
    ] {
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
        info!("💾 已保存: {}", path.display());
    }

    Ok([questions_path, answers_path])
}

fn file_stem(topic: &str) -> String {
    topic
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

// ========== 输出 ==========

fn print_topics() {
    for topic in TOPICS {
        println!("{topic}");
        for subtopic in catalogue::subtopics_for(topic) {
            println!("  - {subtopic}");
        }
    }
}

fn print_subtopics(topic: &str, subtopics: &[String]) {
    if subtopics.is_empty() {
        println!("Subtopics: all areas of {topic}");
    } else {
        println!("Subtopics: {}", subtopics.join(", "));
    }
}

fn print_questions(questions: &[String]) {
    if questions.is_empty() {
        println!("No questions were returned. Try again.");
        return;
    }
    for (i, question) in questions.iter().enumerate() {
        println!("[{}] {}", i + 1, question);
    }
}

fn print_browse(corpus: &QuestionCorpus, topic: &str) {
    println!("{}", format_browse(&browse(corpus, topic)));
}

const EMPTY_TAB: &str = "No questions at this difficulty level.";

fn format_browse(view: &BrowseView<'_>) -> String {
    match view {
        BrowseView::CorpusUnavailable => {
            "Past-paper index is not loaded; browsing is unavailable.".to_string()
        }
        BrowseView::NoResults { topic } => format!("No past-paper questions found for '{topic}'."),
        BrowseView::Results { topic, total, tabs } => {
            let mut out = format!("{total} past-paper questions for '{topic}'\n");
            for tab in tabs {
                out.push_str(&format!("\n== {} ==\n", tab.label()));
                if tab.entries.is_empty() {
                    out.push_str(EMPTY_TAB);
                    out.push('\n');
                }
                for entry in &tab.entries {
                    out.push_str(&format!("{entry}\n\n"));
                }
            }
            out
        }
    }
}

fn print_saved(paths: &[PathBuf]) {
    for path in paths {
        println!("Saved {}", path.display());
    }
}
