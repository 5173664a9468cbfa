use std::time::Duration;

use serde_json::Value;

use crate::config::{LLMProvider, ProviderConfig};
use crate::llm::client::types::{ApiErrorBody, ChatCompletionResponse};
use crate::llm::client::{LLMClient, ProviderClient};
use crate::llm::{TEMPERATURE, TextGenerator};

fn openai_config() -> ProviderConfig {
    ProviderConfig::OpenAI {
        api_key: "sk-test".to_string(),
        model: "gpt-4o".to_string(),
        base_url: "https://api.openai.com/v1".to_string(),
    }
}

fn azure_config() -> ProviderConfig {
    ProviderConfig::Azure {
        api_key: "az-key".to_string(),
        model: "gpt-4o".to_string(),
        endpoint: "https://corp.openai.azure.com".to_string(),
        api_version: "2023-05-15".to_string(),
        deployment: "gpt4-corp".to_string(),
    }
}

fn build(client: &ProviderClient, prompt: &str, max_tokens: u32) -> (reqwest::Request, Value) {
    let body = client.chat_request(prompt, max_tokens);
    let request = client.request(&body).build().unwrap();
    let bytes = request.body().and_then(|b| b.as_bytes()).unwrap().to_vec();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (request, json)
}

#[test]
fn test_openai_request_shape() {
    let client = ProviderClient::new(&openai_config(), Duration::from_secs(5)).unwrap();
    let (request, body) = build(&client, "Describe the scope.", 2048);

    assert_eq!(client.provider(), LLMProvider::OpenAI);
    assert_eq!(request.method(), reqwest::Method::POST);
    assert_eq!(
        request.url().as_str(),
        "https://api.openai.com/v1/chat/completions"
    );
    assert_eq!(
        request.headers().get("authorization").unwrap(),
        "Bearer sk-test"
    );
    assert!(request.headers().get("api-key").is_none());

    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["max_tokens"], 2048);
    assert_eq!(body["temperature"], TEMPERATURE);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "Describe the scope.");
}

#[test]
fn test_azure_request_uses_deployment() {
    let client = ProviderClient::new(&azure_config(), Duration::from_secs(5)).unwrap();
    let (request, body) = build(&client, "Summarize.", 512);

    assert_eq!(client.provider(), LLMProvider::Azure);
    assert_eq!(client.model_slot(), "gpt4-corp");
    assert_eq!(
        request.url().path(),
        "/openai/deployments/gpt4-corp/chat/completions"
    );
    assert_eq!(request.url().query(), Some("api-version=2023-05-15"));
    assert_eq!(request.headers().get("api-key").unwrap(), "az-key");
    assert!(request.headers().get("authorization").is_none());

    assert_eq!(body["model"], "gpt4-corp");
    assert_eq!(body["max_tokens"], 512);
    assert_eq!(body["temperature"], 0.2);
}

#[test]
fn test_describe_names_provider_and_model_slot() {
    let openai = LLMClient::from_provider_config(&openai_config(), Duration::from_secs(5)).unwrap();
    let azure = LLMClient::from_provider_config(&azure_config(), Duration::from_secs(5)).unwrap();

    assert_eq!(openai.describe(), "openai:gpt-4o");
    assert_eq!(azure.describe(), "azure:gpt4-corp");
}

#[test]
fn test_response_first_content() {
    let response: ChatCompletionResponse = serde_json::from_str(
        r#"{"id":"x","choices":[
            {"index":0,"message":{"role":"assistant","content":"first"},"finish_reason":"stop"},
            {"index":1,"message":{"role":"assistant","content":"second"}}
        ]}"#,
    )
    .unwrap();
    assert_eq!(response.first_content(), Some("first"));

    let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
    assert_eq!(empty.first_content(), None);

    let filtered: ChatCompletionResponse =
        serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
            .unwrap();
    assert_eq!(filtered.first_content(), None);
}

#[test]
fn test_api_error_body_describe() {
    let raw = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
    assert_eq!(
        ApiErrorBody::describe(raw),
        "Incorrect API key provided (code: invalid_api_key)"
    );
    assert_eq!(ApiErrorBody::describe("  upstream timeout \n"), "upstream timeout");
}
