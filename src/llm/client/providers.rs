//! LLM Provider支持模块

use std::time::Duration;

use reqwest::RequestBuilder;

use crate::config::{LLMProvider, ProviderConfig};
use crate::error::{AoaError, Result};
use crate::llm::TEMPERATURE;
use crate::llm::client::types::ChatCompletionRequest;

/// OpenAI 公共接口客户端
#[derive(Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

/// Azure OpenAI 客户端，请求路由到指定部署
#[derive(Clone)]
pub struct AzureClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    api_version: String,
    deployment: String,
}

/// 统一的Provider客户端枚举
#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(OpenAIClient),
    Azure(AzureClient),
}

impl ProviderClient {
    /// 根据配置创建相应的provider客户端
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AoaError::config(format!("failed to build HTTP client: {}", e)))?;

        match config {
            ProviderConfig::OpenAI {
                api_key,
                model,
                base_url,
            } => Ok(ProviderClient::OpenAI(OpenAIClient {
                http,
                api_key: api_key.clone(),
                model: model.clone(),
                base_url: base_url.clone(),
            })),
            ProviderConfig::Azure {
                api_key,
                endpoint,
                api_version,
                deployment,
                ..
            } => Ok(ProviderClient::Azure(AzureClient {
                http,
                api_key: api_key.clone(),
                endpoint: endpoint.clone(),
                api_version: api_version.clone(),
                deployment: deployment.clone(),
            })),
        }
    }

    pub fn provider(&self) -> LLMProvider {
        match self {
            ProviderClient::OpenAI(_) => LLMProvider::OpenAI,
            ProviderClient::Azure(_) => LLMProvider::Azure,
        }
    }

    /// 请求体 `model` 字段携带的值：OpenAI 为模型名，Azure 为部署名
    pub fn model_slot(&self) -> &str {
        match self {
            ProviderClient::OpenAI(client) => &client.model,
            ProviderClient::Azure(client) => &client.deployment,
        }
    }

    /// Chat Completions 接口地址
    pub fn completions_url(&self) -> String {
        match self {
            ProviderClient::OpenAI(client) => format!("{}/chat/completions", client.base_url),
            ProviderClient::Azure(client) => format!(
                "{}/openai/deployments/{}/chat/completions",
                client.endpoint, client.deployment
            ),
        }
    }

    /// 构造单轮对话的请求体
    pub fn chat_request(&self, prompt: &str, max_tokens: u32) -> ChatCompletionRequest {
        ChatCompletionRequest::single_turn(self.model_slot(), prompt, max_tokens, TEMPERATURE)
    }

    /// 构造带认证信息的 HTTP 请求
    pub fn request(&self, body: &ChatCompletionRequest) -> RequestBuilder {
        let url = self.completions_url();
        match self {
            ProviderClient::OpenAI(client) => client
                .http
                .post(url)
                .bearer_auth(&client.api_key)
                .json(body),
            ProviderClient::Azure(client) => client
                .http
                .post(url)
                .query(&[("api-version", client.api_version.as_str())])
                .header("api-key", &client.api_key)
                .json(body),
        }
    }
}
