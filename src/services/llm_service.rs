//! LLM 服务 - 业务能力层
//!
//! 只负责"给定系统提示词和用户提示词，返回一段文本"，不关心流程。
//! 不重试、不设置超时、不限流，失败原样交给调用方。
//!
//! ## 技术栈
//! - Anthropic Messages API：直接使用 `reqwest`
//! - 兼容 OpenAI API 的服务：使用 `async-openai` crate

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Config, LlmProvider};
use crate::error::{AppError, AppResult, LlmError};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// 文本生成能力
///
/// 会话只依赖这个 trait，测试里可以换成不联网的实现。
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    /// 发送一次请求，返回模型输出的文本
    async fn generate(&self, system_message: &str, user_message: &str) -> AppResult<String>;
}

/// LLM 服务
///
/// 职责：
/// - 按配置选择提供方
/// - 固定模型和输出长度上限
/// - 只返回第一段文本
pub struct LlmService {
    backend: Backend,
}

enum Backend {
    Anthropic(AnthropicBackend),
    OpenAi(OpenAiBackend),
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> AppResult<Self> {
        if config.llm_api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey {
                provider: config.llm_provider.to_string(),
            }
            .into());
        }

        let backend = match config.llm_provider {
            LlmProvider::Anthropic => Backend::Anthropic(AnthropicBackend {
                http: reqwest::Client::new(),
                api_key: config.llm_api_key.clone(),
                api_base_url: config.llm_api_base_url.trim_end_matches('/').to_string(),
                model_name: config.llm_model_name.clone(),
                max_tokens: config.llm_max_tokens,
            }),
            LlmProvider::OpenAi => {
                let openai_config = OpenAIConfig::new()
                    .with_api_key(&config.llm_api_key)
                    .with_api_base(&config.llm_api_base_url);
                Backend::OpenAi(OpenAiBackend {
                    client: Client::with_config(openai_config),
                    model_name: config.llm_model_name.clone(),
                    max_tokens: config.llm_max_tokens,
                })
            }
        };

        Ok(Self { backend })
    }

    pub fn model_name(&self) -> &str {
        match &self.backend {
            Backend::Anthropic(b) => &b.model_name,
            Backend::OpenAi(b) => &b.model_name,
        }
    }
}

impl TextGenerator for LlmService {
    async fn generate(&self, system_message: &str, user_message: &str) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name());
        debug!(
            "系统消息长度: {} 字符, 用户消息长度: {} 字符",
            system_message.len(),
            user_message.len()
        );

        let content = match &self.backend {
            Backend::Anthropic(b) => b.send(system_message, user_message).await?,
            Backend::OpenAi(b) => b.send(system_message, user_message).await?,
        };

        debug!("LLM API 调用成功");
        Ok(content)
    }
}

// ========== Anthropic ==========

struct AnthropicBackend {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [MessageParam<'a>; 1],
}

#[derive(Debug, Serialize)]
struct MessageParam<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn first_text(self) -> Option<String> {
        self.content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
    }
}

impl AnthropicBackend {
    async fn send(&self, system_message: &str, user_message: &str) -> AppResult<String> {
        let request = MessagesRequest {
            model: &self.model_name,
            max_tokens: self.max_tokens,
            system: system_message,
            messages: [MessageParam {
                role: "user",
                content: user_message,
            }],
        };

        let response = self
            .http
            .post(format!("{}/messages", self.api_base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("LLM API 调用失败: {}", e);
                AppError::llm_api_failed(&self.model_name, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("LLM API 返回错误: {} {}", status, message);
            return Err(LlmError::BadResponse {
                model: self.model_name.clone(),
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;

        body.first_text().ok_or_else(|| {
            LlmError::EmptyContent {
                model: self.model_name.clone(),
            }
            .into()
        })
    }
}

// ========== OpenAI 兼容 ==========

struct OpenAiBackend {
    client: Client<OpenAIConfig>,
    model_name: String,
    max_tokens: u32,
}

impl OpenAiBackend {
    async fn send(&self, system_message: &str, user_message: &str) -> AppResult<String> {
        let model = &self.model_name;

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_message)
            .build()
            .map_err(|e| AppError::llm_api_failed(model, e))?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| AppError::llm_api_failed(model, e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| AppError::llm_api_failed(model, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(model, e)
        })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                LlmError::EmptyContent {
                    model: model.clone(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_rejected() {
        let config = Config::default();
        match LlmService::new(&config) {
            Err(AppError::Llm(LlmError::MissingApiKey { provider })) => {
                assert_eq!(provider, "anthropic")
            }
            _ => panic!("expected MissingApiKey"),
        }
    }

    #[test]
    fn test_first_text_block_is_returned() {
        let body: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "thinking"}, {"type": "text", "text": "1. Solve $x+1=2$"}, {"type": "text", "text": "ignored"}]}"#,
        )
        .unwrap();
        assert_eq!(body.first_text().as_deref(), Some("1. Solve $x+1=2$"));

        let empty: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(empty.first_text().is_none());
    }

    #[test]
    fn test_request_shape() {
        let request = MessagesRequest {
            model: "claude-sonnet-4-20250514",
            max_tokens: 4096,
            system: "sys",
            messages: [MessageParam {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["system"], "sys");
    }

    /// 测试真实 API 调用
    ///
    /// 运行方式：
    /// ```bash
    /// ANTHROPIC_API_KEY=... cargo test test_generate_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_generate_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::load(None).unwrap();
        let service = LlmService::new(&config).unwrap();

        let response = service
            .generate(
                "You are a Leaving Cert Higher Level Maths tutor. Reply with one short question.",
                "Topic: Algebra",
            )
            .await
            .unwrap();

        println!("{}", response);
        assert!(!response.is_empty());
    }
}
