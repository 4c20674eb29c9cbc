//! 文档导出 - 业务能力层
//!
//! 先把练习卷排成一组版面块，再用 `docx-rs` 写成 .docx。
//!
//! 数学标记的处理是有损的：先按固定顺序套用结构替换表，再逐个替换 `\命令`，
//! 符号表中没有的命令一律删除，不保留也不提示。

use docx_rs::{AlignmentType, Docx, Footer, Paragraph, Run};
use phf::phf_map;
use regex::{Captures, Regex};
use std::io::Cursor;
use std::sync::LazyLock;

use crate::error::{AppResult, ExportError};
use crate::services::prompt_builder::join_subtopics;

/// 页脚文字
pub const FOOTER_TEXT: &str =
    "Leaving Certificate Honours Maths - generated practice material, not an official examination paper";

/// 结构替换表：(模式, 替换文本)，按顺序执行
const MARKUP_RULES: &[(&str, &str)] = &[
    (r"\$", ""),
    (r"\\\\", " "),
    (r"\\sqrt\[([^\]]*)\]\{([^{}]*)\}", "($2)^(1/$1)"),
    (r"\\sqrt\{([^{}]*)\}", "sqrt($1)"),
    (r"\\[dt]?frac\{([^{}]*)\}\{([^{}]*)\}", "($1)/($2)"),
    (r"\\(?:text|mathrm|mathbf|operatorname)\{([^{}]*)\}", "$1"),
    (r"\\\{", "{"),
    (r"\\\}", "}"),
    (r"\\([()\[\]%_&#|])", "${1}"),
    (r"\\[,;:! ]", " "),
    (r"\^\{?\\circ\}?", "°"),
];

/// 单个命令的替换；不在表中的命令名删除，紧跟的一层花括号只保留内容。
/// 命令替换后仍残留的反斜杠一律删除。
static SYMBOLS: phf::Map<&'static str, &'static str> = phf_map! {
    "alpha" => "α",
    "beta" => "β",
    "gamma" => "γ",
    "delta" => "δ",
    "Delta" => "Δ",
    "theta" => "θ",
    "lambda" => "λ",
    "mu" => "μ",
    "pi" => "π",
    "sigma" => "σ",
    "Sigma" => "Σ",
    "phi" => "φ",
    "omega" => "ω",
    "leq" => "≤",
    "le" => "≤",
    "geq" => "≥",
    "ge" => "≥",
    "neq" => "≠",
    "ne" => "≠",
    "approx" => "≈",
    "times" => "×",
    "div" => "÷",
    "pm" => "±",
    "cdot" => "·",
    "infty" => "∞",
    "sqrt" => "√",
    "sin" => "sin",
    "cos" => "cos",
    "tan" => "tan",
    "sec" => "sec",
    "csc" => "csc",
    "cot" => "cot",
    "log" => "log",
    "ln" => "ln",
    "exp" => "exp",
    "left" => "",
    "right" => "",
};

static MARKUP_TABLE: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    MARKUP_RULES
        .iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).expect("markup pattern"), *replacement))
        .collect()
});

static COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\([A-Za-z]+)(?:\{([^{}\\]*)\})?").expect("command pattern"));

static EXTRA_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("space pattern"));

static ENUMERATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\*\*)?(?:Q(?:uestion)?\s*)?\d+\s*[.):](?:\*\*)?(?:\s+|$)")
        .expect("enumeration pattern")
});

/// 把数学标记转换为纯文本近似
pub fn strip_markup(text: &str) -> String {
    let mut out = text.to_string();
    for (re, replacement) in MARKUP_TABLE.iter() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out = COMMAND
        .replace_all(&out, |caps: &Captures<'_>| {
            let symbol = SYMBOLS.get(&caps[1]).copied().unwrap_or_default();
            let argument = caps.get(2).map_or("", |m| m.as_str());
            format!("{symbol}{argument}")
        })
        .into_owned()
        .replace('\\', "");
    EXTRA_SPACES.replace_all(&out, " ").trim().to_string()
}

/// 题干/答案正文：去掉开头的题号与 Markdown 加粗，再去掉数学标记
pub fn clean_body(text: &str) -> String {
    let without_number = ENUMERATION.replace(text, "");
    strip_markup(&without_number.replace("**", ""))
}

/// 版面块
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Meta { label: &'static str, value: String },
    Rule,
    QuestionHeading(usize),
    Body(String),
    AnswerHeading,
    ThinRule,
}

/// 导出请求
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub title: String,
    pub topic: &'a str,
    pub subtopics: &'a [String],
    pub difficulty: &'a str,
    pub questions: &'a [String],
    /// 与题目按位置对齐的答案；长度不一致时按较短者截断
    pub answers: Option<&'a [String]>,
    pub date: String,
}

/// 排出版面块（不含页脚）
pub fn build_layout(request: &ExportRequest<'_>) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title(request.title.clone()),
        Block::Meta {
            label: "Topic",
            value: request.topic.to_string(),
        },
        Block::Meta {
            label: "Subtopics",
            value: join_subtopics(request.topic, request.subtopics),
        },
        Block::Meta {
            label: "Difficulty",
            value: request.difficulty.to_string(),
        },
        Block::Meta {
            label: "Date",
            value: request.date.clone(),
        },
        Block::Rule,
    ];

    let count = match request.answers {
        Some(answers) => {
            if answers.len() != request.questions.len() {
                tracing::warn!(
                    "题目数 {} 与答案数 {} 不一致，按较短者导出",
                    request.questions.len(),
                    answers.len()
                );
            }
            request.questions.len().min(answers.len())
        }
        None => request.questions.len(),
    };

    for (i, question) in request.questions.iter().take(count).enumerate() {
        if i > 0 {
            blocks.push(Block::ThinRule);
        }
        blocks.push(Block::QuestionHeading(i + 1));
        blocks.push(Block::Body(clean_body(question)));
        if let Some(answer) = request.answers.and_then(|a| a.get(i)) {
            blocks.push(Block::AnswerHeading);
            blocks.push(Block::Body(clean_body(answer)));
        }
    }

    blocks
}

/// 将版面块写成 .docx 字节
pub fn render_docx(blocks: &[Block]) -> AppResult<Vec<u8>> {
    let mut docx = Docx::new();

    for block in blocks {
        docx = match block {
            Block::Title(title) => docx.add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(title).bold().size(36))
                    .align(AlignmentType::Center),
            ),
            Block::Meta { label, value } => docx.add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(format!("{label}: ")).bold().size(22))
                    .add_run(Run::new().add_text(value).size(22)),
            ),
            Block::Rule => docx.add_paragraph(rule_paragraph("━", 40)),
            Block::ThinRule => docx.add_paragraph(rule_paragraph("─", 60)),
            Block::QuestionHeading(n) => docx.add_paragraph(
                Paragraph::new().add_run(Run::new().add_text(format!("Question {n}")).bold().size(28)),
            ),
            Block::AnswerHeading => docx.add_paragraph(
                Paragraph::new().add_run(Run::new().add_text("Answer").bold().italic().size(24)),
            ),
            Block::Body(text) => text.lines().fold(docx, |docx, line| {
                docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line).size(22)))
            }),
        };
    }

    docx = docx.footer(
        Footer::new().add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(FOOTER_TEXT).italic().size(16).color("666666"))
                .align(AlignmentType::Center),
        ),
    );

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::PackFailed {
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

fn rule_paragraph(glyph: &str, width: usize) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(glyph.repeat(width)).color("999999"))
        .align(AlignmentType::Center)
}

/// 导出单个文档
pub fn export_document(request: &ExportRequest<'_>) -> AppResult<Vec<u8>> {
    if request.questions.is_empty() {
        return Err(ExportError::NothingToExport.into());
    }
    render_docx(&build_layout(request))
}

/// 同一张练习卷的两份文档
#[derive(Debug, Clone)]
pub struct ExportBundle {
    /// 练习卷自身的主题，用于命名文件
    pub topic: String,
    pub questions_only: Vec<u8>,
    pub with_answers: Vec<u8>,
}

/// 同时导出"仅题目"与"题目+答案"两个版本
pub fn export_bundle(
    topic: &str,
    subtopics: &[String],
    difficulty: &str,
    questions: &[String],
    answers: &[String],
) -> AppResult<ExportBundle> {
    let date = chrono::Local::now().format("%d %B %Y").to_string();

    let questions_only = export_document(&ExportRequest {
        title: format!("{topic} Exam Paper Questions"),
        topic,
        subtopics,
        difficulty,
        questions,
        answers: None,
        date: date.clone(),
    })?;

    let with_answers = export_document(&ExportRequest {
        title: format!("{topic} Exam Paper Questions & Answers"),
        topic,
        subtopics,
        difficulty,
        questions,
        answers: Some(answers),
        date,
    })?;

    Ok(ExportBundle {
        topic: topic.to_string(),
        questions_only,
        with_answers,
    })
}
