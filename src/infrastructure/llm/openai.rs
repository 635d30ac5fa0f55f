use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::super::http_client::HttpClientTrait;
use crate::domain::{Completion, CompletionRequest, DomainError, LlmProvider, Message, Usage};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// OpenAI chat-completions provider
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, model: &str, request: &CompletionRequest) -> serde_json::Value {
        let messages: Vec<OpenAiMessage> = request
            .messages
            .iter()
            .map(OpenAiMessage::from_domain)
            .collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(
        &self,
        json: serde_json::Value,
        latency_ms: u64,
    ) -> Result<Completion, DomainError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))?;

        let usage = response
            .usage
            .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(
            Completion::new(response.id, response.model, choice.message.content.unwrap_or_default())
                .with_usage(usage)
                .with_latency(latency_ms),
        )
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn complete(
        &self,
        model: &str,
        request: CompletionRequest,
    ) -> Result<Completion, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(model, &request);

        let start = Instant::now();
        let response = self.client.post_json(&url, self.headers(), &body).await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        self.parse_response(response, latency_ms)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl OpenAiMessage {
    fn from_domain(message: &Message) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    id: String,
    model: String,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;
    use crate::infrastructure::http_client::HttpClient;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_URL: &str = "https://api.openai.com/v1/chat/completions";

    fn chat_response_body() -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "model": "gpt-3.5-turbo",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "Hello! How can I help you?"
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 8,
                "total_tokens": 18
            }
        })
    }

    #[tokio::test]
    async fn test_openai_complete() {
        let client = MockHttpClient::new().with_response(TEST_URL, chat_response_body());
        let provider = OpenAiProvider::new(client, "test-api-key");

        let request = CompletionRequest::builder().user("Hello!").build();
        let completion = provider.complete("gpt-3.5-turbo", request).await.unwrap();

        assert_eq!(completion.id, "chatcmpl-123");
        assert_eq!(completion.model, "gpt-3.5-turbo");
        assert_eq!(completion.text, "Hello! How can I help you?");
        assert_eq!(completion.usage.prompt_tokens, 10);
        assert_eq!(completion.usage.completion_tokens, 8);
        assert_eq!(completion.usage.total_tokens, 18);
    }

    #[tokio::test]
    async fn test_openai_error_propagates() {
        let client = MockHttpClient::new().with_error(TEST_URL, "API key invalid");
        let provider = OpenAiProvider::new(client, "invalid-key");

        let request = CompletionRequest::builder().user("Hello!").build();
        let result = provider.complete("gpt-3.5-turbo", request).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_openai_request_body_shape() {
        let client = MockHttpClient::new().with_response(TEST_URL, chat_response_body());
        let provider = OpenAiProvider::new(client, "test-api-key");

        let request = CompletionRequest::builder()
            .system("Be brief.")
            .user("Hi")
            .temperature(0.5)
            .max_tokens(64)
            .build();
        provider.complete("gpt-3.5-turbo", request).await.unwrap();

        let posted = provider.client.posted_bodies();
        assert_eq!(posted.len(), 1);

        let body = &posted[0].1;
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Hi");
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["max_tokens"], 64);
    }

    #[tokio::test]
    async fn test_openai_against_http_server() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(
                serde_json::json!({"model": "gpt-3.5-turbo"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response_body()))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::with_base_url(HttpClient::new(), "test-key", server.uri());

        let request = CompletionRequest::builder().user("Hello!").build();
        let completion = provider.complete("gpt-3.5-turbo", request).await.unwrap();

        assert_eq!(completion.text, "Hello! How can I help you?");
    }

    #[tokio::test]
    async fn test_openai_upstream_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::with_base_url(HttpClient::new(), "test-key", server.uri());

        let request = CompletionRequest::builder().user("Hello!").build();
        let result = provider.complete("gpt-3.5-turbo", request).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }
}
