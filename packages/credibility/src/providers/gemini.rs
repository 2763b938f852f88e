//! Gemini `generateContent` adapter (key-based, search-augmented).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::ApiKey;
use crate::error::{ErrorRecord, Failure, Result};
use crate::pipeline::prompts::Prompt;
use crate::providers::PROVIDER_TIMEOUT;
use crate::traits::Provider;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Google Gemini with Google Search grounding and thinking disabled.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    /// Built once; a build error is reported on every call as `ClientInit`
    http_client: std::result::Result<reqwest::Client, String>,
    api_key: Option<ApiKey>,
    model: String,
    base_url: String,
    temperature: f32,
}

impl GeminiProvider {
    /// A missing key is accepted here and reported on the first call.
    pub fn new(api_key: Option<ApiKey>) -> Self {
        Self {
            http_client: build_client(PROVIDER_TIMEOUT),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.5,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = build_client(timeout);
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "tools": [{ "google_search": {} }],
            "generationConfig": {
                "temperature": self.temperature,
                "thinkingConfig": { "thinkingBudget": 0 }
            }
        })
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let api_key = match &self.api_key {
            Some(key) if !key.is_blank() => key,
            _ => return Err(Failure::MissingCredential { provider: "gemini" }.into()),
        };

        let client = self.http_client.as_ref().map_err(|detail| {
            ErrorRecord::from(Failure::ClientInit {
                detail: detail.clone(),
            })
        })?;

        let prompt = Prompt {
            system: system_prompt.to_string(),
            user: user_prompt.to_string(),
        }
        .combined();
        debug!(model = %self.model, prompt_len = prompt.len(), "Sending Gemini request");

        let response = client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key.expose())
            .json(&self.request_body(&prompt))
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Failure::HttpStatus {
                status: status.as_u16(),
            }
            .into());
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ErrorRecord::from(Failure::Timeout)
            } else {
                ErrorRecord::from(Failure::Malformed {
                    detail: format!("unreadable Gemini response: {}", e),
                })
            }
        })?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        Ok(text)
    }
}

fn build_client(timeout: Duration) -> std::result::Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| e.to_string())
}

fn transport_failure(e: reqwest::Error) -> ErrorRecord {
    if e.is_timeout() {
        Failure::Timeout.into()
    } else {
        Failure::Transport {
            detail: e.to_string(),
        }
        .into()
    }
}
