//! LLM客户端 - 提供统一的LLM服务接口

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use crate::config::{LLMConfig, ProviderConfig};
use crate::error::{AoaError, Result};
use crate::llm::TextGenerator;

mod providers;
pub mod types;

pub use providers::{AzureClient, OpenAIClient, ProviderClient};

use types::{ApiErrorBody, ChatCompletionResponse};

/// LLM客户端 - 每个实例独占自己的 HTTP 客户端与凭据，不依赖进程级全局状态
#[derive(Clone)]
pub struct LLMClient {
    client: ProviderClient,
}

impl LLMClient {
    /// 从配置（结合环境变量）创建新的LLM客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let provider_config = config.resolve()?;
        Self::from_provider_config(
            &provider_config,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// 从已校验的 provider 配置创建客户端
    pub fn from_provider_config(config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        let client = ProviderClient::new(config, timeout)?;
        Ok(Self { client })
    }

    pub fn provider_client(&self) -> &ProviderClient {
        &self.client
    }

    fn provider_error(&self, message: impl ToString) -> AoaError {
        AoaError::provider(self.client.provider().to_string(), message)
    }
}

#[async_trait]
impl TextGenerator for LLMClient {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let body = self.client.chat_request(prompt, max_tokens);
        let started = Instant::now();
        debug!(
            provider = %self.client.provider(),
            model = %body.model,
            prompt_chars = prompt.chars().count(),
            max_tokens,
            "sending chat completion request"
        );

        let response = self
            .client
            .request(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.provider_error(format!("request timed out: {}", e))
                } else {
                    self.provider_error(format!("network error: {}", e))
                }
            })?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| self.provider_error(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(self.provider_error(format!(
                "HTTP {}: {}",
                status,
                ApiErrorBody::describe(&raw)
            )));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&raw)
            .map_err(|e| self.provider_error(format!("failed to parse response: {}", e)))?;

        let content = parsed
            .first_content()
            .ok_or_else(|| self.provider_error("response contained no completion content"))?;

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            finish_reason = parsed
                .choices
                .first()
                .and_then(|choice| choice.finish_reason.as_deref())
                .unwrap_or("unknown"),
            "chat completion received"
        );

        Ok(content.trim().to_string())
    }

    fn describe(&self) -> String {
        format!("{}:{}", self.client.provider(), self.client.model_slot())
    }
}

// Include tests
#[cfg(test)]
mod tests;
