//! Analyzer configuration.
//!
//! Resolved once by the host process and handed to
//! [`AnalysisOrchestrator::from_config`](crate::AnalysisOrchestrator::from_config).
//! Nothing in this crate reads the environment.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretBox};
use thiserror::Error;

use crate::pipeline::orchestrator::OrchestratorOptions;
use crate::pipeline::retry::RetryPolicy;
use crate::providers::{GeminiProvider, PollinationsProvider};
use crate::traits::Provider;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no provider selected (expected \"gemini\" or \"pollinations\")")]
    MissingProvider,

    #[error("unknown provider: {0} (expected \"gemini\" or \"pollinations\")")]
    UnknownProvider(String),

    #[error("{0} requires an API key")]
    MissingCredential(&'static str),

    #[error("failed to build provider: {0}")]
    Provider(String),
}

/// Which backend answers analysis calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderSelection {
    /// Key-based, search-augmented
    Gemini,
    /// Keyless OpenAI-compatible endpoint
    Pollinations,
}

impl ProviderSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderSelection::Gemini => "gemini",
            ProviderSelection::Pollinations => "pollinations",
        }
    }
}

impl fmt::Display for ProviderSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(ConfigError::MissingProvider);
        }
        match value.to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderSelection::Gemini),
            "pollinations" => Ok(ProviderSelection::Pollinations),
            _ => Err(ConfigError::UnknownProvider(value.to_string())),
        }
    }
}

/// An API key that never shows up in logs, `Debug` or `Display` output.
pub struct ApiKey(SecretBox<str>);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(value.into().into_boxed_str()))
    }

    /// Only call this where the key is actually sent.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl Clone for ApiKey {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Everything the orchestrator needs from process configuration.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub provider: ProviderSelection,
    pub gemini_api_key: Option<ApiKey>,
    pub retry: RetryPolicy,

    /// Answer with a degraded placeholder instead of an error when the
    /// verdict allows it
    pub allow_degraded: bool,

    /// Override for the Gemini API base URL
    pub gemini_base_url: Option<String>,

    /// Override for the Pollinations base URL
    pub pollinations_base_url: Option<String>,
}

impl AnalyzerConfig {
    pub fn new(provider: ProviderSelection) -> Self {
        Self {
            provider,
            gemini_api_key: None,
            retry: RetryPolicy::default(),
            allow_degraded: true,
            gemini_base_url: None,
            pollinations_base_url: None,
        }
    }

    pub fn with_gemini_api_key(mut self, key: impl Into<ApiKey>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_allow_degraded(mut self, allow: bool) -> Self {
        self.allow_degraded = allow;
        self
    }

    pub fn with_gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_base_url = Some(url.into());
        self
    }

    pub fn with_pollinations_base_url(mut self, url: impl Into<String>) -> Self {
        self.pollinations_base_url = Some(url.into());
        self
    }

    /// Fail fast on combinations that could never serve a request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider == ProviderSelection::Gemini
            && self.gemini_api_key.as_ref().map_or(true, ApiKey::is_blank)
        {
            return Err(ConfigError::MissingCredential("gemini"));
        }
        Ok(())
    }

    /// Construct the selected provider.
    pub fn build_provider(&self) -> Result<Arc<dyn Provider>, ConfigError> {
        self.validate()?;

        let provider: Arc<dyn Provider> = match self.provider {
            ProviderSelection::Gemini => {
                let mut gemini = GeminiProvider::new(self.gemini_api_key.clone());
                if let Some(url) = &self.gemini_base_url {
                    gemini = gemini.with_base_url(url);
                }
                Arc::new(gemini)
            }
            ProviderSelection::Pollinations => {
                let pollinations = match &self.pollinations_base_url {
                    Some(url) => PollinationsProvider::with_base_url(url),
                    None => PollinationsProvider::new(),
                }
                .map_err(|e| ConfigError::Provider(e.to_string()))?;
                Arc::new(pollinations)
            }
        };

        Ok(provider)
    }

    pub fn options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            retry: self.retry,
            allow_degraded: self.allow_degraded,
            ..OrchestratorOptions::default()
        }
    }
}
