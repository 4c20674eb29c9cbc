//! 命令行参数解析
//!
//! 只定义参数结构，执行逻辑在 `app.rs`。

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::Difficulty;

/// LC Higher Level Maths 练习助手
#[derive(Debug, Parser)]
#[command(name = "lc-maths")]
#[command(about = "Leaving Cert Higher Level Maths practice generator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// 配置文件路径（覆盖 $LC_MATHS_CONFIG 和 ./lc-maths.toml）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用命令
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List topics and their subtopics
    Topics,

    /// Generate 10 questions at one difficulty
    Worksheet {
        #[command(flatten)]
        selection: Selection,

        /// easy, medium or hard
        #[arg(short, long, default_value = "medium", value_parser = parse_difficulty)]
        difficulty: Difficulty,

        /// Write questions-only and questions+answers .docx files
        #[arg(long)]
        export: bool,
    },

    /// Generate one question per selected subtopic
    Balanced {
        #[command(flatten)]
        selection: Selection,

        #[arg(long)]
        export: bool,
    },

    /// Generate 3 multi-part exam questions with marks
    ExamStyle {
        #[command(flatten)]
        selection: Selection,

        #[arg(long)]
        export: bool,
    },

    /// Browse past-paper questions for a topic, grouped by difficulty
    Browse {
        /// Topic (substring match against corpus tags)
        topic: String,
    },

    /// Generate a new question similar to a past-paper entry
    PastSimilar {
        /// Trigger key shown by `browse`, e.g. past_2019_Paper2_4
        key: String,
    },

    /// Interactive study session
    Study {
        #[command(flatten)]
        selection: Selection,
    },
}

/// 主题和子主题选择
#[derive(Debug, Clone, Args)]
pub struct Selection {
    /// Topic name, e.g. "Calculus"
    #[arg(default_value = "Algebra")]
    pub topic: String,

    /// Subtopics separated by `;` (or repeat the flag); empty means the whole topic
    #[arg(short, long, value_delimiter = ';')]
    pub subtopics: Vec<String>,
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    Difficulty::parse(value).ok_or_else(|| format!("unknown difficulty '{value}' (easy, medium, hard)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worksheet_arguments() {
        let cli = Cli::parse_from([
            "lc-maths",
            "worksheet",
            "Calculus",
            "--subtopics",
            "Integration;Differentiation",
            "-s",
            "Rates of change",
            "-d",
            "HARD",
            "--export",
        ]);
        match cli.command {
            Commands::Worksheet {
                selection,
                difficulty,
                export,
            } => {
                assert_eq!(selection.topic, "Calculus");
                assert_eq!(selection.subtopics, vec!["Integration", "Differentiation", "Rates of change"]);
                assert_eq!(difficulty, Difficulty::Hard);
                assert!(export);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_and_defaults() {
        let cli = Cli::parse_from(["lc-maths", "exam-style", "--verbose", "--config", "x.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        match cli.command {
            Commands::ExamStyle { selection, export } => {
                assert_eq!(selection.topic, "Algebra");
                assert!(selection.subtopics.is_empty());
                assert!(!export);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bad_difficulty_is_rejected() {
        assert!(Cli::try_parse_from(["lc-maths", "worksheet", "-d", "impossible"]).is_err());
    }
}
