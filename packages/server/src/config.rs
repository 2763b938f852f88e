use anyhow::{bail, Context, Result};
use credibility::{AnalyzerConfig, ProviderSelection};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub analyzer: AnalyzerConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider: ProviderSelection = lookup("MODEL")
            .unwrap_or_default()
            .parse()
            .context("MODEL must be set to 'gemini' or 'pollinations'")?;

        let port = match lookup("PORT") {
            Some(port) => port.trim().parse().context("PORT must be a valid number")?,
            None => 8080,
        };

        let allow_degraded = match lookup("ALLOW_DEGRADED") {
            Some(value) => parse_bool(&value).context("ALLOW_DEGRADED must be true or false")?,
            None => true,
        };

        let mut analyzer = AnalyzerConfig::new(provider).with_allow_degraded(allow_degraded);
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()) {
            analyzer = analyzer.with_gemini_api_key(key);
        }

        analyzer
            .validate()
            .context("GEMINI_API_KEY must be set when MODEL=gemini")?;

        Ok(Self { port, analyzer })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("invalid boolean: {}", other),
    }
}
