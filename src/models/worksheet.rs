use crate::models::question::Difficulty;

/// 练习卷生成方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorksheetMode {
    /// 指定难度的 10 道题
    Difficulty(Difficulty),
    /// 每个子主题一道题
    Balanced,
    /// 3 道多小问的考试风格大题
    ExamStyle,
}

impl WorksheetMode {
    /// 界面上显示的模式名称
    pub fn label(self) -> &'static str {
        match self {
            WorksheetMode::Difficulty(d) => d.label(),
            WorksheetMode::Balanced => "Balanced",
            WorksheetMode::ExamStyle => "Exam Style",
        }
    }

    /// 生成时使用的难度过滤；混合模式为空
    pub fn difficulty(self) -> Option<Difficulty> {
        match self {
            WorksheetMode::Difficulty(d) => Some(d),
            _ => None,
        }
    }
}

/// 当前会话生成的练习卷
#[derive(Debug, Clone)]
pub struct Worksheet {
    pub topic: String,
    pub subtopics: Vec<String>,
    pub mode: WorksheetMode,
    pub questions: Vec<String>,
}

impl Worksheet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 追问答案时传给模型的难度描述
    pub fn difficulty_label(&self) -> &'static str {
        self.mode.label()
    }
}

/// 与练习卷按位置对齐的答案，按需生成
#[derive(Debug, Clone, Default)]
pub struct AnswerSet {
    answers: Vec<Option<String>>,
}

impl AnswerSet {
    /// 为 `len` 道题创建空答案集
    pub fn for_questions(len: usize) -> Self {
        Self {
            answers: vec![None; len],
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.answers.get(index).and_then(|a| a.as_deref())
    }

    pub fn set(&mut self, index: usize, answer: String) {
        if let Some(slot) = self.answers.get_mut(index) {
            *slot = Some(answer);
        }
    }

    /// 尚未生成答案的题目序号（0-based）
    pub fn missing(&self) -> Vec<usize> {
        self.answers
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// 从第一题开始连续已生成的答案
    pub fn contiguous(&self) -> Vec<String> {
        self.answers
            .iter()
            .map_while(|a| a.clone())
            .collect()
    }
}
