use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "lc-maths.toml";

/// LLM 服务提供方
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmProvider {
    /// Anthropic Messages API
    Anthropic,
    /// 兼容 OpenAI API 的服务
    OpenAi,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(LlmProvider::Anthropic),
            "openai" | "openai-compatible" => Ok(LlmProvider::OpenAi),
            _ => Err(ConfigError::UnknownProvider {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Anthropic => write!(f, "anthropic"),
            LlmProvider::OpenAi => write!(f, "openai"),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 真题索引 JSON 文件列表（按顺序合并）
    pub corpus_files: Vec<String>,
    /// 导出文档的目录
    pub export_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_provider: LlmProvider,
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_files: vec![
                "JSON Files/exam-index1.json".to_string(),
                "JSON Files/exam-index2.json".to_string(),
            ],
            export_dir: "exports".to_string(),
            verbose_logging: false,
            llm_provider: LlmProvider::Anthropic,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.anthropic.com/v1".to_string(),
            llm_model_name: "claude-sonnet-4-20250514".to_string(),
            llm_max_tokens: 4096,
        }
    }
}

/// 配置文件中的可选字段
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    corpus_files: Option<Vec<String>>,
    export_dir: Option<String>,
    verbose_logging: Option<bool>,
    llm: Option<FileLlmConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct FileLlmConfig {
    provider: Option<String>,
    api_key: Option<String>,
    api_base_url: Option<String>,
    model_name: Option<String>,
    max_tokens: Option<u32>,
}

impl Config {
    /// 加载配置：默认值 → 配置文件（可选）→ 环境变量
    ///
    /// `path` 为空时依次尝试 `LC_MATHS_CONFIG` 与 `lc-maths.toml`，文件不存在不算错误。
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let env_path = std::env::var("LC_MATHS_CONFIG").ok();
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env_path.map(Into::into))
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.into());

        let mut config = Self::default();
        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFailed {
                path: path.display().to_string(),
                source,
            })?;
            config = config.merge_toml(&content, &path.display().to_string())?;
        }
        config.apply_env()
    }

    /// 用 TOML 内容覆盖当前配置
    pub fn merge_toml(mut self, content: &str, origin: &str) -> AppResult<Self> {
        let file: FileConfig =
            toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
                path: origin.to_string(),
                source,
            })?;

        if let Some(files) = file.corpus_files {
            self.corpus_files = files;
        }
        if let Some(dir) = file.export_dir {
            self.export_dir = dir;
        }
        if let Some(verbose) = file.verbose_logging {
            self.verbose_logging = verbose;
        }
        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                self.set_provider(provider.parse()?);
            }
            if let Some(key) = llm.api_key {
                self.llm_api_key = key;
            }
            if let Some(url) = llm.api_base_url {
                self.llm_api_base_url = url;
            }
            if let Some(model) = llm.model_name {
                self.llm_model_name = model;
            }
            if let Some(max_tokens) = llm.max_tokens {
                self.llm_max_tokens = max_tokens;
            }
        }
        Ok(self)
    }

    fn apply_env(mut self) -> AppResult<Self> {
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            self.set_provider(provider.parse()?);
        }
        if let Some(key) = std::env::var("LLM_API_KEY")
            .ok()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
        {
            self.llm_api_key = key;
        }
        if let Ok(url) = std::env::var("LLM_API_BASE_URL") {
            self.llm_api_base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL_NAME") {
            self.llm_model_name = model;
        }
        if let Ok(value) = std::env::var("LLM_MAX_TOKENS") {
            self.llm_max_tokens = parse_env("LLM_MAX_TOKENS", &value, "u32")?;
        }
        if let Ok(files) = std::env::var("LC_CORPUS_FILES") {
            self.corpus_files = files
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Ok(dir) = std::env::var("EXPORT_DIR") {
            self.export_dir = dir;
        }
        if let Ok(value) = std::env::var("VERBOSE_LOGGING") {
            self.verbose_logging = parse_env("VERBOSE_LOGGING", &value, "bool")?;
        }
        Ok(self)
    }

    /// 切换提供方；基础地址仍是另一方的默认值时一并切换
    fn set_provider(&mut self, provider: LlmProvider) {
        if provider == LlmProvider::OpenAi
            && self.llm_api_base_url == Self::default().llm_api_base_url
        {
            self.llm_api_base_url = "https://api.openai.com/v1".to_string();
        }
        self.llm_provider = provider;
    }
}

fn parse_env<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> AppResult<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_both_index_files() {
        let config = Config::default();
        assert_eq!(config.corpus_files.len(), 2);
        assert_eq!(config.llm_provider, LlmProvider::Anthropic);
        assert_eq!(config.llm_max_tokens, 4096);
    }

    #[test]
    fn test_merge_toml_overrides_only_given_fields() {
        let content = r#"
corpus_files = ["data/a.json"]

[llm]
model_name = "claude-test"
max_tokens = 1024
"#;
        let config = Config::default().merge_toml(content, "test.toml").unwrap();
        assert_eq!(config.corpus_files, vec!["data/a.json".to_string()]);
        assert_eq!(config.llm_model_name, "claude-test");
        assert_eq!(config.llm_max_tokens, 1024);
        assert_eq!(config.export_dir, "exports");
    }

    #[test]
    fn test_switching_to_openai_moves_default_base_url() {
        let content = "[llm]\nprovider = \"openai\"\n";
        let config = Config::default().merge_toml(content, "test.toml").unwrap();
        assert_eq!(config.llm_provider, LlmProvider::OpenAi);
        assert_eq!(config.llm_api_base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = Config::default()
            .merge_toml("corpus_files = 3", "broken.toml")
            .unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!("gemini".parse::<LlmProvider>().is_err());
        assert_eq!("Claude".parse::<LlmProvider>().unwrap(), LlmProvider::Anthropic);
    }
}
