//! Pollinations adapter (keyless, OpenAI-compatible chat endpoint).

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};
use tracing::debug;

use crate::error::{ErrorRecord, Failure, Result};
use crate::providers::PROVIDER_TIMEOUT;
use crate::traits::Provider;

pub const DEFAULT_BASE_URL: &str = "https://text.pollinations.ai";
pub const DEFAULT_MODEL: &str = "openai-fast";
const CHAT_PATH: &str = "/openai";

#[derive(Debug, Clone)]
pub struct PollinationsProvider {
    client: OpenAIClient,
    model: String,
    temperature: f32,
}

impl PollinationsProvider {
    pub fn new() -> std::result::Result<Self, OpenAIError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> std::result::Result<Self, OpenAIError> {
        let client = OpenAIClient::keyless(base_url)
            .with_chat_path(CHAT_PATH)
            .with_timeout(PROVIDER_TIMEOUT)?;
        Ok(Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl Provider for PollinationsProvider {
    fn name(&self) -> &'static str {
        "pollinations"
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(system_prompt))
            .message(Message::user(user_prompt))
            .temperature(self.temperature)
            .no_stream()
            .json_object()
            .extra("private", false);

        debug!(
            model = %self.model,
            url = %self.client.chat_url(),
            prompt_len = system_prompt.len() + user_prompt.len(),
            "Sending Pollinations request"
        );

        let response = self.client.chat_completion(request).await.map_err(into_record)?;
        Ok(response.content)
    }
}

fn into_record(error: OpenAIError) -> ErrorRecord {
    let failure = match error {
        OpenAIError::Status { status, .. } => Failure::HttpStatus { status },
        OpenAIError::Timeout => Failure::Timeout,
        OpenAIError::Network(detail) => Failure::Transport { detail },
        OpenAIError::Config(detail) => Failure::ClientInit { detail },
        OpenAIError::Api(detail) | OpenAIError::Parse(detail) => Failure::Malformed { detail },
    };
    failure.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_request_payload_and_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/openai")
            .match_body(Matcher::PartialJson(json!({
                "model": "openai-fast",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "user"}
                ],
                "temperature": 0.7,
                "stream": false,
                "private": false,
                "response_format": {"type": "json_object"}
            })))
            .with_status(200)
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "{\"confidence\": 80}"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = PollinationsProvider::with_base_url(server.url()).unwrap();
        let text = provider.complete("sys", "user").await.unwrap();
        assert_eq!(text, "{\"confidence\": 80}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_errors_are_classified() {
        let cases = [
            (429, ErrorKind::RateLimited, true),
            (503, ErrorKind::ApiUnavailable, true),
            (404, ErrorKind::ApiUnavailable, false),
            (400, ErrorKind::InvalidContent, false),
        ];

        for (status, kind, retryable) in cases {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("POST", "/openai")
                .with_status(status)
                .with_body("upstream said no")
                .create_async()
                .await;

            let provider = PollinationsProvider::with_base_url(server.url()).unwrap();
            let err = provider.complete("s", "u").await.unwrap_err();
            assert_eq!(err.kind, kind, "status {status}");
            assert_eq!(err.retryable, retryable, "status {status}");
        }
    }

    #[tokio::test]
    async fn test_missing_choices_is_invalid_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/openai")
            .with_status(200)
            .with_body("{\"choices\": []}")
            .create_async()
            .await;

        let provider = PollinationsProvider::with_base_url(server.url()).unwrap();
        let err = provider.complete("s", "u").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidContent);
        assert!(err.retryable);
    }

    #[test]
    fn test_error_mapping() {
        let record = into_record(OpenAIError::Network("reset".into()));
        assert_eq!(record.kind, ErrorKind::NetworkError);

        let record = into_record(OpenAIError::Config("tls".into()));
        assert_eq!(record.kind, ErrorKind::ApiUnavailable);
        assert!(record.retryable);

        let record = into_record(OpenAIError::Timeout);
        assert_eq!(record.failure(), &Failure::Timeout);
    }

    #[tokio::test]
    async fn test_unreachable_host_message_is_stable() {
        let provider = PollinationsProvider::with_base_url("http://127.0.0.1:1").unwrap();
        let err = provider.complete("s", "u").await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::NetworkError);
        assert_eq!(err.message, "provider transport failure");

        let value = serde_json::to_value(&err).unwrap();
        assert!(!value.to_string().contains("127.0.0.1"));
    }
}
