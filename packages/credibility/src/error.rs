//! Typed errors for the analysis pipeline.
//!
//! Every failure below the orchestrator is described by a [`Failure`] and
//! surfaced as an [`ErrorRecord`]. Callers branch on [`ErrorKind`], never on
//! message text.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Provider rate limit (HTTP 429)
    RateLimited,
    /// Provider down, missing, misconfigured or endpoint gone
    ApiUnavailable,
    /// Bad input, or a provider answer that failed extraction/validation
    InvalidContent,
    /// Transport failure not otherwise classified
    NetworkError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::RateLimited => "RATE_LIMITED",
            ErrorKind::ApiUnavailable => "API_UNAVAILABLE",
            ErrorKind::InvalidContent => "INVALID_CONTENT",
            ErrorKind::NetworkError => "NETWORK_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Low-level cause of a failed step, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Provider answered with a non-2xx status
    HttpStatus { status: u16 },

    /// Connection-level failure (refused, reset, DNS)
    Transport { detail: String },

    /// Provider call exceeded its timeout
    Timeout,

    /// HTTP client for the provider could not be created
    ClientInit { detail: String },

    /// Key-based provider selected without a credential
    MissingCredential { provider: &'static str },

    /// Raw response contains no balanced JSON object
    NoJsonObject,

    /// JSON object did not parse into the expected shape
    Malformed { detail: String },

    /// Every score zero and every reasoning list empty, or no short verdict
    Degenerate,

    /// A score outside `[0, 100]`
    OutOfRange { field: &'static str, value: i64 },

    /// More than one short-text verdict populated
    ConflictingVerdicts { count: usize },

    /// Input content empty after normalization
    EmptyContent,

    /// Input content shorter than the minimum after normalization
    ContentTooShort { chars: usize, min: usize },

    /// Caller cancelled the analysis
    Cancelled,
}

/// A classified failure as seen by callers.
///
/// Built from a [`Failure`] by the classifier table (see
/// [`crate::pipeline::classify`]); `attempt` is stamped by the retry loop.
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{kind}: {message}")]
pub struct ErrorRecord {
    pub kind: ErrorKind,

    /// Stable, machine-oriented message
    pub message: String,

    pub retryable: bool,

    /// Human-readable hint for end users
    pub user_message: String,

    /// Provider attempt that produced this error (0 = before any call)
    pub attempt: u32,

    #[serde(skip)]
    pub failure: Failure,
}

impl ErrorRecord {
    /// Record the attempt number this error belongs to.
    pub fn at_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }

    pub fn failure(&self) -> &Failure {
        &self.failure
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ErrorRecord>;
