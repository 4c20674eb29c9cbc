//! 学习会话 - 流程层
//!
//! 一次学习会话持有：当前选择的主题/子主题、当前练习卷、按需生成的答案、
//! "再来一道"缓存和真题相似题缓存。真题库只读借用，生成器由会话独占。
//!
//! 每次交互是一条完整的链路：构建提示词 → 调用模型 → 拆分 → 写回会话状态。

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::{AppResult, SessionError};
use crate::models::catalogue::{self, TOPICS};
use crate::models::{AnswerSet, QuestionCorpus, Worksheet, WorksheetMode};
use crate::services::document_exporter::{export_bundle, ExportBundle};
use crate::services::prompt_builder::{build_prompt, OperationKind, PromptRequest};
use crate::services::response_splitter::{join_units, split_response};
use crate::services::TextGenerator;
use crate::utils::logging::truncate_text;
use crate::workflow::past_papers::find_by_key;

/// 真题条目没有难度时，生成相似题使用的难度
const DEFAULT_PAST_DIFFICULTY: &str = "Medium";

/// 学习会话
pub struct Session<'c, G> {
    corpus: &'c QuestionCorpus,
    generator: G,
    topic: String,
    subtopics: Vec<String>,
    worksheet: Option<Worksheet>,
    answers: AnswerSet,
    /// 题目序号（0-based）→ 最近一次生成的相似题
    similar: HashMap<usize, String>,
    /// 真题触发键 → 最近一次生成的相似题
    past_similar: HashMap<String, String>,
}

impl<'c, G: TextGenerator> Session<'c, G> {
    /// 创建新会话，默认选中第一个主题、不选子主题
    pub fn new(corpus: &'c QuestionCorpus, generator: G) -> Self {
        Self {
            corpus,
            generator,
            topic: TOPICS[0].to_string(),
            subtopics: Vec::new(),
            worksheet: None,
            answers: AnswerSet::default(),
            similar: HashMap::new(),
            past_similar: HashMap::new(),
        }
    }

    /// 选择主题和子主题（忽略大小写，保存标准写法）
    ///
    /// 已生成的练习卷不受影响，直到下一次生成。
    pub fn select(&mut self, topic: &str, subtopics: &[String]) -> AppResult<()> {
        let topic = catalogue::find_topic(topic).ok_or_else(|| SessionError::UnknownTopic {
            topic: topic.to_string(),
        })?;

        let subtopics = subtopics
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                catalogue::find_subtopic(topic, s)
                    .map(str::to_string)
                    .ok_or_else(|| SessionError::UnknownSubtopic {
                        topic: topic.to_string(),
                        subtopic: s.trim().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("选择主题: {}，子主题: {:?}", topic, subtopics);
        self.topic = topic.to_string();
        self.subtopics = subtopics;
        Ok(())
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn subtopics(&self) -> &[String] {
        &self.subtopics
    }

    pub fn worksheet(&self) -> Option<&Worksheet> {
        self.worksheet.as_ref()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// 按模式为当前选择生成练习卷
    ///
    /// 新练习卷替换旧的，同时清空答案和相似题缓存。
    pub async fn generate(&mut self, mode: WorksheetMode) -> AppResult<&Worksheet> {
        let kind = match mode {
            WorksheetMode::Difficulty(_) => OperationKind::Worksheet,
            WorksheetMode::Balanced => OperationKind::Balanced,
            WorksheetMode::ExamStyle => OperationKind::ExamStyle,
        };

        info!("📝 生成练习卷: {} ({})", self.topic, mode.label());
        let questions = self
            .run(PromptRequest {
                kind,
                topic: &self.topic,
                subtopics: &self.subtopics,
                difficulty: mode.difficulty().map(|d| d.label()),
                question: None,
            })
            .await?;

        if questions.is_empty() {
            warn!("⚠️ 模型没有返回任何题目");
        } else {
            info!("✅ 生成 {} 道题", questions.len());
        }

        self.answers = AnswerSet::for_questions(questions.len());
        self.similar.clear();
        self.past_similar.clear();
        Ok(self.worksheet.insert(Worksheet {
            topic: self.topic.clone(),
            subtopics: self.subtopics.clone(),
            mode,
            questions,
        }))
    }

    /// 第 `number` 题（从 1 开始）的分步解答，已生成过则直接返回
    pub async fn show_answer(&mut self, number: usize) -> AppResult<&str> {
        let index = self.question_index(number)?;
        if self.answers.get(index).is_none() {
            let answer = self.answer_for(index).await?;
            self.answers.set(index, answer);
        }
        Ok(self.answers.get(index).unwrap_or_default())
    }

    /// 为第 `number` 题（从 1 开始）生成一道相似题，每次调用都重新生成
    pub async fn more_like_this(&mut self, number: usize) -> AppResult<&str> {
        let index = self.question_index(number)?;
        let Some(worksheet) = self.worksheet.as_ref() else {
            return Err(SessionError::NoWorksheet.into());
        };

        let similar = self
            .run_whole(PromptRequest {
                kind: OperationKind::Similar,
                topic: &worksheet.topic,
                subtopics: &worksheet.subtopics,
                difficulty: worksheet.mode.difficulty().map(|d| d.label()),
                question: Some(&worksheet.questions[index]),
            })
            .await?;

        debug!("相似题 #{}: {}", number, truncate_text(&similar, 80));
        self.similar.insert(index, similar);
        Ok(self.similar.get(&index).map(String::as_str).unwrap_or_default())
    }

    /// 最近一次为第 `number` 题生成的相似题
    pub fn cached_similar(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.similar.get(&i))
            .map(String::as_str)
    }

    /// 针对一道真题生成相似的新题
    pub async fn similar_to_past_paper(&mut self, key: &str) -> AppResult<&str> {
        let question =
            find_by_key(self.corpus, key).ok_or_else(|| SessionError::PastPaperNotFound {
                key: key.to_string(),
            })?;

        let topic = question.topics_joined();
        let difficulty = question
            .difficulty
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(DEFAULT_PAST_DIFFICULTY);

        info!("🔁 根据真题 {} 生成相似题", key);
        let similar = self
            .run_whole(PromptRequest {
                kind: OperationKind::Similar,
                topic: &topic,
                subtopics: &[],
                difficulty: Some(difficulty),
                question: Some(question.description_label()),
            })
            .await?;

        self.past_similar.insert(key.to_string(), similar);
        Ok(self.past_similar.get(key).map(String::as_str).unwrap_or_default())
    }

    /// 导出当前练习卷；缺少的答案会先补齐
    pub async fn export(&mut self) -> AppResult<ExportBundle> {
        if self.worksheet.is_none() {
            return Err(SessionError::NoWorksheet.into());
        }

        let missing = self.answers.missing();
        if !missing.is_empty() {
            info!("📖 导出前补齐 {} 道题的答案", missing.len());
        }
        for index in missing {
            let answer = self.answer_for(index).await?;
            self.answers.set(index, answer);
        }

        let Some(worksheet) = self.worksheet.as_ref() else {
            return Err(SessionError::NoWorksheet.into());
        };
        export_bundle(
            &worksheet.topic,
            &worksheet.subtopics,
            worksheet.difficulty_label(),
            &worksheet.questions,
            &self.answers.contiguous(),
        )
    }

    /// 1-based 题号转为下标
    fn question_index(&self, number: usize) -> AppResult<usize> {
        let worksheet = self.worksheet.as_ref().ok_or(SessionError::NoWorksheet)?;
        if number == 0 || number > worksheet.len() {
            return Err(SessionError::QuestionOutOfRange {
                index: number,
                len: worksheet.len(),
            }
            .into());
        }
        Ok(number - 1)
    }

    async fn answer_for(&self, index: usize) -> AppResult<String> {
        let worksheet = self.worksheet.as_ref().ok_or(SessionError::NoWorksheet)?;
        self.run_whole(PromptRequest {
            kind: OperationKind::Answer,
            topic: &worksheet.topic,
            subtopics: &worksheet.subtopics,
            difficulty: worksheet.mode.difficulty().map(|d| d.label()),
            question: Some(&worksheet.questions[index]),
        })
        .await
    }

    /// 相似题和解答：拆分后重新拼回一段文本
    async fn run_whole(&self, request: PromptRequest<'_>) -> AppResult<String> {
        let split = request.kind.template().split;
        let units = self.run(request).await?;
        Ok(join_units(&units, split))
    }

    /// 构建提示词 → 调用模型 → 按模板拆分并截断
    async fn run(&self, request: PromptRequest<'_>) -> AppResult<Vec<String>> {
        let template = request.kind.template();
        let prompt = build_prompt(self.corpus, &request);
        debug!("{:?} 提示词: {}", request.kind, truncate_text(&prompt.user, 120));

        let text = self.generator.generate(&prompt.system, &prompt.user).await?;

        let mut units = split_response(&text, template.split);
        if let Some(cap) = template.cap {
            units.truncate(cap);
        }
        Ok(units)
    }
}
