//! Credibility Analysis Pipeline
//!
//! Sends a piece of text to a generative-AI provider and turns whatever comes
//! back into a validated credibility assessment, or a typed error.
//!
//! # Usage
//!
//! ```rust,ignore
//! use credibility::{AnalysisOrchestrator, AnalysisRequest, AnalyzerConfig, ProviderSelection};
//!
//! let config = AnalyzerConfig::new(ProviderSelection::Gemini)
//!     .with_gemini_api_key(std::env::var("GEMINI_API_KEY")?);
//! let orchestrator = AnalysisOrchestrator::from_config(&config)?;
//!
//! let outcome = orchestrator
//!     .analyze(&AnalysisRequest::long_text(text))
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`pipeline`] - Extraction, validation, classification, retry, degradation
//! - [`providers`] - Gemini and Pollinations adapters
//! - [`traits`] - The [`Provider`] seam
//! - [`types`] - Requests and results
//! - [`config`] - Provider selection and credentials
//! - [`testing`] - Scripted mock provider

pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod testing;
pub mod traits;
pub mod types;

pub use config::{AnalyzerConfig, ApiKey, ConfigError, ProviderSelection};
pub use error::{ErrorKind, ErrorRecord, Failure, Result};
pub use pipeline::{
    AnalysisOrchestrator, OrchestratorOptions, RecoveryStrategy, RecoveryVerdict, RetryPolicy,
    Severity,
};
pub use providers::{GeminiProvider, PollinationsProvider};
pub use traits::Provider;
pub use types::{
    AnalysisOutcome, AnalysisRequest, AnalysisResult, Assessment, Categories, Reasoning,
    ShortAnalysisResult, ShortAssessment, ShortVerdict, Variant,
};

// Re-export for callers of `analyze_with_cancel`
pub use tokio_util::sync::CancellationToken;
