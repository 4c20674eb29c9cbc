//! 提示词构建 - 业务能力层
//!
//! 每种操作类型对应一条模板记录（题量、是否多小问、是否标分值、是否含解答、拆分方式），
//! 所有提示词都由同一个构建函数根据模板记录拼出。

use crate::models::{CorpusQuestion, QuestionCorpus};
use crate::services::response_splitter::SplitMode;
use crate::services::topic_matcher;

/// 所有模板共用的数学排版规则
pub const NOTATION_RULE: &str = "Use LaTeX formatting for ALL mathematical expressions. \
Use ONLY inline LaTeX with single dollar signs: $ ... $. \
Never use $$ ... $$ under any circumstances. \
Never output plain text maths such as x^2, 1/6, sqrt(x), etc. \
Every mathematical expression must be inside $ ... $.";

const REFERENCE_INTRO: &str = "IMPORTANT: The examples below are from REAL LC papers. \
Study their style, structure, and difficulty level, then create NEW questions inspired by this format.";

const REFERENCE_WARNING: &str =
    "⚠️ DO NOT copy these questions. Use them ONLY as style references to create NEW, ORIGINAL questions.";

/// 生成操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// 指定难度的 10 道题
    Worksheet,
    /// 每个子主题一道题
    Balanced,
    /// 一道相似的新题
    Similar,
    /// 3 道带分值的多小问大题
    ExamStyle,
    /// 分步解答
    Answer,
}

/// 输出数量要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCount {
    Exactly(usize),
    PerSubtopic,
    WorkedSolution,
}

/// 操作类型对应的模板记录
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub role: &'static str,
    pub output: OutputCount,
    pub multi_part: bool,
    pub includes_marks: bool,
    pub includes_solution: bool,
    pub split: SplitMode,
    /// 写入提示词的风格参考题数量上限
    pub reference_limit: usize,
    /// 拆分后保留的条目上限
    pub cap: Option<usize>,
}

impl OperationKind {
    pub fn template(self) -> Template {
        match self {
            OperationKind::Worksheet => Template {
                role: "tutor",
                output: OutputCount::Exactly(10),
                multi_part: false,
                includes_marks: false,
                includes_solution: false,
                split: SplitMode::Lines,
                reference_limit: topic_matcher::MAX_STYLE_REFERENCES,
                cap: None,
            },
            OperationKind::Balanced => Template {
                role: "tutor",
                output: OutputCount::PerSubtopic,
                multi_part: false,
                includes_marks: false,
                includes_solution: false,
                split: SplitMode::Lines,
                reference_limit: topic_matcher::MAX_STYLE_REFERENCES,
                cap: None,
            },
            OperationKind::Similar => Template {
                role: "tutor",
                output: OutputCount::Exactly(1),
                multi_part: false,
                includes_marks: false,
                includes_solution: false,
                split: SplitMode::Whole,
                reference_limit: 2,
                cap: None,
            },
            OperationKind::ExamStyle => Template {
                role: "examiner",
                output: OutputCount::Exactly(3),
                multi_part: true,
                includes_marks: true,
                includes_solution: false,
                split: SplitMode::BlankLines,
                reference_limit: topic_matcher::MAX_STYLE_REFERENCES,
                cap: Some(3),
            },
            OperationKind::Answer => Template {
                role: "tutor",
                output: OutputCount::WorkedSolution,
                multi_part: false,
                includes_marks: false,
                includes_solution: true,
                split: SplitMode::Whole,
                reference_limit: 0,
                cap: None,
            },
        }
    }
}

/// 构建提示词所需的输入
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub kind: OperationKind,
    pub topic: &'a str,
    pub subtopics: &'a [String],
    /// 难度过滤；为空时不限难度
    pub difficulty: Option<&'a str>,
    /// 相似题和解答所针对的原题
    pub question: Option<&'a str>,
}

/// (系统提示词, 用户提示词)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// 构建发送给模型的提示词
pub fn build_prompt(corpus: &QuestionCorpus, request: &PromptRequest<'_>) -> PromptPair {
    let template = request.kind.template();
    let chosen = join_subtopics(request.topic, request.subtopics);
    let difficulty = request.difficulty.unwrap_or("Mixed");

    let references = topic_matcher::style_references(corpus, request.topic, request.difficulty);
    let shown = &references[..references.len().min(template.reference_limit)];

    let mut system = vec![format!(
        "You are a Leaving Cert Higher Level Maths {}.",
        template.role
    )];
    system.push(task_line(request.kind, &template));
    if template.multi_part {
        system.push(
            "Use multi-part structure (a), (b), (c) where appropriate and include realistic LC-style contexts. \
You may include diagrams described in words."
                .to_string(),
        );
    }
    if template.includes_marks {
        system.push("Include marks for each part, e.g. '(a) [10 marks]'.".to_string());
    }
    if request.kind != OperationKind::Answer {
        system.push(
            "Do NOT quote or reproduce any past exam paper. Only create new, original questions."
                .to_string(),
        );
    }
    system.push(format!("Difficulty level: {difficulty}."));
    if matches!(
        request.kind,
        OperationKind::Worksheet | OperationKind::Balanced | OperationKind::ExamStyle
    ) {
        system.push(format!("Focus ONLY on these subtopics: {chosen}."));
    }
    system.push(NOTATION_RULE.to_string());
    match template.split {
        SplitMode::Lines => system.push("Return the questions as a numbered list, one per line.".to_string()),
        SplitMode::BlankLines => system.push("Return the questions separated by blank lines.".to_string()),
        SplitMode::Whole => {}
    }
    if !template.includes_solution {
        system.push("Do NOT include solutions.".to_string());
    }

    let mut system = system.join(" ");
    if !shown.is_empty() {
        system.push('\n');
        system.push_str(REFERENCE_INTRO);
        system.push_str(&format_style_references(shown));
    }

    PromptPair {
        system,
        user: user_prompt(request, &template, &chosen, difficulty),
    }
}

fn task_line(kind: OperationKind, template: &Template) -> String {
    match (kind, template.output) {
        (OperationKind::ExamStyle, OutputCount::Exactly(n)) => format!(
            "Generate exactly {n} NEW exam-style questions that EXACTLY match the tone, structure, \
difficulty and progression of REAL LC Higher Level papers."
        ),
        (_, OutputCount::Exactly(1)) => {
            "Generate ONE new question similar in style and difficulty to the original but not identical. \
Follow authentic LC exam question format."
                .to_string()
        }
        (_, OutputCount::Exactly(n)) => format!(
            "Generate exactly {n} unique exam-style questions that match REAL Leaving Cert exam style."
        ),
        (_, OutputCount::PerSubtopic) => "Generate ONE exam-style question for EACH selected subtopic. \
Match the authentic LC exam style shown in the reference examples."
            .to_string(),
        (_, OutputCount::WorkedSolution) => {
            "Provide a full step-by-step worked solution matching LC marking scheme style.".to_string()
        }
    }
}

fn user_prompt(
    request: &PromptRequest<'_>,
    template: &Template,
    chosen: &str,
    difficulty: &str,
) -> String {
    let topic = request.topic;
    let question = request.question.unwrap_or_default();
    match (request.kind, template.output) {
        (OperationKind::Worksheet, OutputCount::Exactly(n)) => format!(
            "Create a {difficulty} worksheet on {topic}. Subtopics: {chosen}. \
Generate {n} NEW questions that match the LC exam style shown in the examples. \
Ensure ALL maths is in LaTeX wrapped in $ ... $."
        ),
        (OperationKind::ExamStyle, OutputCount::Exactly(n)) => format!(
            "Topic: {topic}\nSubtopics: {chosen}\n\
Generate exactly {n} Higher Level exam-style questions matching REAL LC exam format. \
Each question may contain multiple parts. Use LaTeX with $ ... $ for all maths. \
Return the questions separated by blank lines."
        ),
        (OperationKind::Similar, _) => {
            format!("Topic: {topic}\nOriginal question: {question}\n\nCreate a NEW similar question.")
        }
        (OperationKind::Answer, _) => format!("Topic: {topic}\nQuestion: {question}"),
        _ => format!("Topic: {topic}\nSubtopics: {chosen}\n\nCreate NEW questions matching LC exam style."),
    }
}

/// 子主题拼成可读短语；未选择时覆盖整个主题
pub fn join_subtopics(topic: &str, subtopics: &[String]) -> String {
    let chosen: Vec<&str> = subtopics
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if chosen.is_empty() {
        format!("all areas of {topic}")
    } else {
        chosen.join(", ")
    }
}

/// 将风格参考题格式化为提示词片段
pub fn format_style_references(references: &[&CorpusQuestion]) -> String {
    if references.is_empty() {
        return String::new();
    }

    let mut formatted = String::from("\n\nREAL LEAVING CERT EXAM EXAMPLES (for style reference only):\n");
    for (i, q) in references.iter().enumerate() {
        formatted.push_str(&format!("\nExample {}:\n", i + 1));
        formatted.push_str(&format!("Question: {}\n", q.number_label()));
        formatted.push_str(&format!("Topics: {}\n", q.topics_joined()));
        formatted.push_str(&format!("Difficulty: {}\n", q.difficulty_label()));
        formatted.push_str(&format!("Description: {}\n", q.description_label()));
        formatted.push_str(&format!(
            "Year/Paper: {} {}\n",
            q.year_label(),
            q.paper_label()
        ));
    }
    formatted.push('\n');
    formatted.push_str(REFERENCE_WARNING);
    formatted.push('\n');
    formatted
}
