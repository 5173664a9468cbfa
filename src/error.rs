use std::path::PathBuf;

use thiserror::Error;

/// 运行过程中所有致命错误的分类，任一错误都会终止本次生成
#[derive(Debug, Error)]
pub enum AoaError {
    /// 配置缺失或非法：凭据缺失、provider 名称无法解析、目录格式错误等
    #[error("configuration error: {0}")]
    Configuration(String),

    /// 模板或输入文档缺失、不可读，或输入不是合法 JSON
    #[error("input error: {message} ({})", path.display())]
    Input { path: PathBuf, message: String },

    /// LLM provider 在 generate 过程中返回的任何失败
    #[error("provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    /// 输出路径不可写
    #[error("output error: {message} ({})", path.display())]
    Output { path: PathBuf, message: String },
}

impl AoaError {
    pub fn config(message: impl Into<String>) -> Self {
        AoaError::Configuration(message.into())
    }

    pub fn input(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        AoaError::Input {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl ToString) -> Self {
        AoaError::Provider {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        AoaError::Output {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T, E = AoaError> = std::result::Result<T, E>;
