//! Minimal client for OpenAI-compatible chat-completion endpoints
//!
//! No domain-specific logic. Works against the OpenAI API itself and against
//! compatible hosts that need no key at all.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::keyless("https://text.pollinations.ai")
//!     .with_chat_path("/openai")
//!     .with_timeout(Duration::from_secs(30))?;
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("openai-fast")
//!         .message(Message::user("Hello!"))
//!         .json_object(),
//! ).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use std::time::Duration;

use reqwest::{header, Client};
use tracing::{debug, warn};

/// Chat-completions client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
    chat_path: String,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("chat_path", &self.chat_path)
            .finish()
    }
}

impl OpenAIClient {
    /// Create a new client that authenticates with a bearer key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: Some(api_key.into()),
            base_url: "https://api.openai.com/v1".to_string(),
            chat_path: "/chat/completions".to_string(),
        }
    }

    /// Create a client for an endpoint that needs no credential.
    pub fn keyless(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: None,
            base_url: base_url.into(),
            chat_path: "/chat/completions".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies, compatible hosts, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the path appended to the base URL for chat completions.
    pub fn with_chat_path(mut self, path: impl Into<String>) -> Self {
        self.chat_path = path.into();
        self
    }

    /// Bound every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpenAIError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL chat requests are posted to.
    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.chat_path)
    }

    /// Whether requests carry an `Authorization` header.
    pub fn is_keyless(&self) -> bool {
        self.api_key.is_none()
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion endpoint and return the first
    /// choice's content.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let mut builder = self
            .http_client
            .post(self.chat_url())
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", key));
        }

        let response = builder.json(&request).send().await.map_err(|e| {
            warn!(error = %e, "Chat completion request failed");
            OpenAIError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %truncate_to_char_boundary(&error_text, 500), "Chat completion API error");
            return Err(OpenAIError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response.text().await.map_err(OpenAIError::from)?;
        let chat_response: types::ChatResponseRaw = serde_json::from_str(&body)
            .map_err(|e| OpenAIError::Parse(format!("invalid chat response: {}", e)))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OpenAIError::Api("No content in chat response".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            response_len = content.len(),
            "Chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }
}
