//! # LC Maths Tutor
//!
//! Leaving Cert Higher Level 数学练习题生成工具
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 真题索引、主题目录、练习卷与答案
//! - `QuestionCorpus` - 合并后的只读真题库，缺失文件只记警告
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不持有会话状态
//! - `topic_matcher` - 按主题和难度挑选风格参考题
//! - `prompt_builder` - 按操作类型的模板记录拼出提示词
//! - `LlmService` - 调用模型生成文本
//! - `response_splitter` - 把模型输出拆成题目
//! - `document_exporter` - 清理 LaTeX 并导出 .docx
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 一次学习会话的完整流程
//! - `Session` - 当前选择、练习卷、答案和缓存
//! - `past_papers` - 真题浏览和触发键
//!
//! ### ④ 编排层（App）
//! - `app` / `cli` - 命令行入口和交互式学习模式
//!
//! ## 模块结构

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::{Config, LlmProvider};
pub use error::{AppError, AppResult};
pub use models::{CorpusQuestion, Difficulty, QuestionCorpus, Worksheet, WorksheetMode};
pub use services::{LlmService, TextGenerator};
pub use workflow::Session;
