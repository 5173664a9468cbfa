use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{AoaError, Result};

/// 未显式指定配置文件时，在项目根目录下查找的默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "aoa.toml";

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_AZURE_API_VERSION: &str = "2023-05-15";

/// 环境变量名
pub struct EnvKeys;

impl EnvKeys {
    pub const PROVIDER: &'static str = "LLM_PROVIDER";
    pub const OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    pub const AZURE_API_KEY: &'static str = "AZURE_OPENAI_API_KEY";
    pub const AZURE_API_BASE: &'static str = "AZURE_OPENAI_API_BASE";
    pub const AZURE_API_VERSION: &'static str = "AZURE_OPENAI_API_VERSION";
    pub const AZURE_DEPLOYMENT: &'static str = "AZURE_OPENAI_DEPLOYMENT";
}

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "azure")]
    Azure,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Azure => write!(f, "azure"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "azure" => Ok(LLMProvider::Azure),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 项目根目录，模板、输入与输出的相对路径都基于此解析
    pub project_root: PathBuf,

    /// 报告模板路径
    pub template_path: PathBuf,

    /// 项目描述输入文档路径
    pub input_path: PathBuf,

    /// 报告输出路径
    pub output_path: PathBuf,

    /// 外部章节目录文件，未设置时使用内置目录
    pub catalog_path: Option<PathBuf>,

    /// 直接以字段值替换的占位符
    pub literal_fields: Vec<String>,

    /// 章节引用的输入字段缺失时是否视为错误
    pub strict_fields: bool,

    /// 跳过模板中不存在占位符的章节
    pub skip_unused_sections: bool,

    /// 是否启用详细日志
    pub verbose: bool,

    /// LLM模型配置
    pub llm: LLMConfig,
}

/// LLM模型配置
///
/// 这里的字段都是"显式配置"，未设置的部分在 [`LLMConfig::resolve`] 时由环境变量补齐。
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型，未设置时读取 `LLM_PROVIDER`
    pub provider: Option<LLMProvider>,

    /// LLM API KEY，未设置时读取对应 provider 的环境变量
    pub api_key: Option<String>,

    /// 模型名称
    pub model: String,

    /// 单次生成的最大tokens
    pub max_tokens: u32,

    /// 请求超时时间（秒）
    pub timeout_seconds: u64,

    /// OpenAI API基地址
    pub openai_base_url: String,

    /// Azure OpenAI endpoint
    pub azure_api_base: Option<String>,

    /// Azure OpenAI API 版本
    pub azure_api_version: Option<String>,

    /// Azure 部署名称，缺省与模型名称相同
    pub azure_deployment: Option<String>,
}

/// 经过校验的 provider 配置
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        model: String,
        base_url: String,
    },
    Azure {
        api_key: String,
        model: String,
        endpoint: String,
        api_version: String,
        deployment: String,
    },
}

impl ProviderConfig {
    pub fn provider(&self) -> LLMProvider {
        match self {
            ProviderConfig::OpenAI { .. } => LLMProvider::OpenAI,
            ProviderConfig::Azure { .. } => LLMProvider::Azure,
        }
    }

    /// 请求体中 `model` 字段实际携带的值
    pub fn model_slot(&self) -> &str {
        match self {
            ProviderConfig::OpenAI { model, .. } => model,
            ProviderConfig::Azure { deployment, .. } => deployment,
        }
    }
}

impl LLMConfig {
    /// 结合进程环境变量解析出 provider 配置
    pub fn resolve(&self) -> Result<ProviderConfig> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// 以给定的环境变量来源解析 provider 配置
    pub fn resolve_with<F>(&self, env: F) -> Result<ProviderConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());
        let explicit = |value: &Option<String>| {
            value
                .as_ref()
                .filter(|value| !value.trim().is_empty())
                .cloned()
        };

        let provider = match self.provider {
            Some(provider) => provider,
            None => match lookup(EnvKeys::PROVIDER) {
                Some(raw) => raw.parse::<LLMProvider>().map_err(AoaError::config)?,
                None => LLMProvider::default(),
            },
        };

        if self.model.trim().is_empty() {
            return Err(AoaError::config("model name must not be empty"));
        }

        match provider {
            LLMProvider::OpenAI => {
                let api_key = explicit(&self.api_key)
                    .or_else(|| lookup(EnvKeys::OPENAI_API_KEY))
                    .ok_or_else(|| {
                        AoaError::config(format!(
                            "missing API key for provider openai, set {}",
                            EnvKeys::OPENAI_API_KEY
                        ))
                    })?;
                Ok(ProviderConfig::OpenAI {
                    api_key,
                    model: self.model.clone(),
                    base_url: trim_base_url(&self.openai_base_url),
                })
            }
            LLMProvider::Azure => {
                let api_key = explicit(&self.api_key)
                    .or_else(|| lookup(EnvKeys::AZURE_API_KEY))
                    .ok_or_else(|| {
                        AoaError::config(format!(
                            "missing API key for provider azure, set {}",
                            EnvKeys::AZURE_API_KEY
                        ))
                    })?;
                let endpoint = explicit(&self.azure_api_base)
                    .or_else(|| lookup(EnvKeys::AZURE_API_BASE))
                    .ok_or_else(|| {
                        AoaError::config(format!(
                            "missing endpoint for provider azure, set {}",
                            EnvKeys::AZURE_API_BASE
                        ))
                    })?;
                let api_version = explicit(&self.azure_api_version)
                    .or_else(|| lookup(EnvKeys::AZURE_API_VERSION))
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string());
                let deployment = explicit(&self.azure_deployment)
                    .or_else(|| lookup(EnvKeys::AZURE_DEPLOYMENT))
                    .unwrap_or_else(|| self.model.clone());

                Ok(ProviderConfig::Azure {
                    api_key,
                    model: self.model.clone(),
                    endpoint: trim_base_url(&endpoint),
                    api_version,
                    deployment,
                })
            }
        }
    }
}

/// 从工作目录加载 `.env` 到进程环境，已存在的环境变量不会被覆盖
///
/// 文件不存在不算错误；文件存在但无法解析时只记录警告。
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded environment variables");
            Some(path)
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(error = %e, "failed to load .env file");
            None
        }
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AoaError::config(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            AoaError::config(format!(
                "failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// 加载项目根目录下的配置：显式指定的文件必须存在，否则尝试默认的 `aoa.toml`
    pub fn load(project_root: &Path, config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(&project_root.join(path))?,
            None => {
                let default_path = project_root.join(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.project_root = project_root.to_path_buf();
        Ok(config)
    }

    /// 基于项目根目录解析路径；绝对路径原样返回
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        self.project_root.join(path)
    }

    pub fn template_file(&self) -> PathBuf {
        self.resolve_path(&self.template_path)
    }

    pub fn input_file(&self) -> PathBuf {
        self.resolve_path(&self.input_path)
    }

    pub fn output_file(&self) -> PathBuf {
        self.resolve_path(&self.output_path)
    }

    pub fn catalog_file(&self) -> Option<PathBuf> {
        self.catalog_path.as_deref().map(|path| self.resolve_path(path))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            template_path: PathBuf::from("aoa_templates/aoa_template.md"),
            input_path: PathBuf::from("data/sample_input.json"),
            output_path: PathBuf::from("aoa_report.md"),
            catalog_path: None,
            literal_fields: vec!["project_name".to_string()],
            strict_fields: false,
            skip_unused_sections: false,
            verbose: false,
            llm: LLMConfig::default(),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: None,
            api_key: None,
            model: String::from(DEFAULT_MODEL),
            max_tokens: 2048,
            timeout_seconds: 300,
            openai_base_url: String::from(DEFAULT_OPENAI_BASE_URL),
            azure_api_base: None,
            azure_api_version: None,
            azure_deployment: None,
        }
    }
}
