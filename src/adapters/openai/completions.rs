//! OpenAI chat completion provider adapter.
//!
//! Makes direct HTTP calls to the `/v1/chat/completions` endpoint. The
//! whole prompt (context plus question, or an extraction template) is sent
//! as a single user message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::ProviderConfig;
use crate::domain::ports::CompletionProvider;

use super::{classify_status, resolve_api_key};

/// OpenAI chat completion provider.
pub struct OpenAiCompletionProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAiCompletionProvider {
    pub fn new(config: ProviderConfig) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.completion_model.clone(),
            temperature: self.config.temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> EngineResult<String> {
        let api_key = resolve_api_key(&self.config)?;
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| EngineError::TransientService(format!("Completion request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(classify_status(
                status,
                format!("Completion API returned {status}: {body}"),
            ));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Service(format!("Failed to parse completion response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| EngineError::Service("Completion response had no choices".to_string()))
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: String) -> ProviderConfig {
        ProviderConfig {
            api_key: Some("test-key".to_string()),
            base_url,
            ..ProviderConfig::default()
        }
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices": [{"message": {"role": "assistant", "content": "The governing law is Delaware."}}]}"#,
            )
            .create_async()
            .await;

        let provider = OpenAiCompletionProvider::new(test_config(server.url())).unwrap();
        let answer = provider.complete("Which law governs?").await.unwrap();
        mock.assert_async().await;

        assert_eq!(answer, "The governing law is Delaware.");
    }

    #[tokio::test]
    async fn test_server_error_is_transient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let provider = OpenAiCompletionProvider::new(test_config(server.url())).unwrap();
        let err = provider.complete("q").await.unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn test_build_request_single_user_message() {
        let provider =
            OpenAiCompletionProvider::new(test_config("http://localhost:1".to_string())).unwrap();
        let request = provider.build_request("hello");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
        assert_eq!(request.model, "gpt-4o-mini");
    }
}
