use async_trait::async_trait;

use crate::error::Result;

pub mod client;

pub use client::LLMClient;

/// 所有请求使用的采样温度，偏向确定性、贴合主题的输出
pub const TEMPERATURE: f64 = 0.2;

/// 未指定时单次生成的最大tokens
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// 文本生成能力
///
/// 每次调用都是单轮对话：prompt 作为唯一一条 user 消息发送，返回排名第一的候选内容（去除首尾空白）。
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String>;

    /// 用于日志的描述，例如 `azure:gpt4-corp`
    fn describe(&self) -> String;
}
