//! Failure classification.
//!
//! Two pure steps:
//! - [`ErrorClassifier::record`] maps a [`Failure`] onto the closed taxonomy
//!   (kind, retryability default, messages).
//! - [`ErrorClassifier::verdict`] turns a record into a [`RecoveryVerdict`]
//!   for the retry loop, including the backoff delay for its attempt.
//!
//! | Failure                         | Kind           | Retryable | Strategy |
//! |---------------------------------|----------------|-----------|----------|
//! | HTTP 429                        | RateLimited    | yes       | Retry    |
//! | HTTP 5xx                        | ApiUnavailable | yes       | Retry    |
//! | HTTP 404                        | ApiUnavailable | no        | Fallback |
//! | HTTP 400                        | InvalidContent | no        | Abort    |
//! | other HTTP 4xx                  | ApiUnavailable | no        | Abort    |
//! | other HTTP status               | NetworkError   | yes       | Retry    |
//! | transport / timeout             | NetworkError   | yes       | Retry    |
//! | client init                     | ApiUnavailable | yes       | Retry    |
//! | missing credential              | ApiUnavailable | no        | Abort    |
//! | bad / degenerate / out of range | InvalidContent | yes       | Retry    |
//! | empty or short input            | InvalidContent | no        | Abort    |
//! | cancelled                       | NetworkError   | no        | Abort    |
//!
//! A `Retry` on the last permitted attempt becomes `Degrade`.

use std::time::Duration;

use serde::Serialize;

use crate::error::{ErrorKind, ErrorRecord, Failure};

/// Upper bound for any single backoff sleep.
pub const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Hard cap on provider calls per orchestrated request.
pub const MAX_ATTEMPTS: u32 = 3;

const USER_RETRY: &str = "Try analyzing the content again";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// What the retry loop should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStrategy {
    /// Sleep for the backoff delay, then call the provider again
    Retry,
    /// Stop; a substitute result is acceptable
    Fallback,
    /// Stop; retries are spent, answer with a degraded result
    Degrade,
    /// Stop and surface the error
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryVerdict {
    pub severity: Severity,
    pub strategy: RecoveryStrategy,
    pub retryable: bool,
    pub backoff_delay: Duration,
}

struct Classification {
    kind: ErrorKind,
    retryable: bool,
    severity: Severity,
    strategy: RecoveryStrategy,
    message: String,
    user_message: &'static str,
}

impl Classification {
    fn new(
        kind: ErrorKind,
        retryable: bool,
        severity: Severity,
        strategy: RecoveryStrategy,
        message: impl Into<String>,
        user_message: &'static str,
    ) -> Self {
        Self {
            kind,
            retryable,
            severity,
            strategy,
            message: message.into(),
            user_message,
        }
    }
}

/// Stateless, deterministic failure classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorClassifier {
    base_delay: Duration,
    max_attempts: u32,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl ErrorClassifier {
    /// `max_attempts` is clamped to `1..=MAX_ATTEMPTS`.
    pub fn new(base_delay: Duration, max_attempts: u32) -> Self {
        Self {
            base_delay,
            max_attempts: max_attempts.clamp(1, MAX_ATTEMPTS),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Build the caller-facing record for a failure. `attempt` starts at 0.
    pub fn record(failure: Failure) -> ErrorRecord {
        let c = classify(&failure);
        ErrorRecord {
            kind: c.kind,
            message: c.message,
            retryable: c.retryable,
            user_message: c.user_message.to_string(),
            attempt: 0,
            failure,
        }
    }

    /// Decide how to recover from `record`, given the attempt it failed on.
    pub fn verdict(&self, record: &ErrorRecord) -> RecoveryVerdict {
        let c = classify(&record.failure);
        let mut strategy = c.strategy;
        if strategy == RecoveryStrategy::Retry && record.attempt >= self.max_attempts {
            strategy = RecoveryStrategy::Degrade;
        }

        let backoff_delay = match strategy {
            RecoveryStrategy::Retry => self.backoff_delay(record.attempt),
            _ => Duration::ZERO,
        };

        RecoveryVerdict {
            severity: c.severity,
            strategy,
            retryable: record.retryable,
            backoff_delay,
        }
    }

    /// `min(base × 2^(attempt-1), MAX_BACKOFF)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF)
    }
}

impl From<Failure> for ErrorRecord {
    fn from(failure: Failure) -> Self {
        ErrorClassifier::record(failure)
    }
}

fn classify(failure: &Failure) -> Classification {
    use ErrorKind::*;
    use RecoveryStrategy::*;

    match failure {
        Failure::HttpStatus { status } => classify_status(*status),
        Failure::Transport { .. } => Classification::new(
            NetworkError,
            true,
            Severity::Medium,
            Retry,
            "provider transport failure",
            "Please check your internet connection and try again",
        ),
        Failure::Timeout => Classification::new(
            NetworkError,
            true,
            Severity::Medium,
            Retry,
            "provider request timed out",
            "The analysis service is slow to respond, please try again",
        ),
        Failure::ClientInit { .. } => Classification::new(
            ApiUnavailable,
            true,
            Severity::High,
            Retry,
            "failed to initialize provider client",
            "Please try again in a few minutes",
        ),
        Failure::MissingCredential { .. } => Classification::new(
            ApiUnavailable,
            false,
            Severity::Critical,
            Abort,
            "provider credential is missing",
            "The analysis service is not configured",
        ),
        Failure::NoJsonObject => Classification::new(
            InvalidContent,
            true,
            Severity::Low,
            Retry,
            "no JSON object in analysis response",
            USER_RETRY,
        ),
        Failure::Malformed { .. } => Classification::new(
            InvalidContent,
            true,
            Severity::Low,
            Retry,
            "failed to parse analysis response",
            USER_RETRY,
        ),
        Failure::Degenerate => Classification::new(
            InvalidContent,
            true,
            Severity::Low,
            Retry,
            "analysis response carries no assessment",
            USER_RETRY,
        ),
        Failure::OutOfRange { .. } => Classification::new(
            InvalidContent,
            true,
            Severity::Low,
            Retry,
            "analysis score out of range",
            USER_RETRY,
        ),
        Failure::ConflictingVerdicts { .. } => Classification::new(
            InvalidContent,
            true,
            Severity::Low,
            Retry,
            "multiple analysis conclusions",
            USER_RETRY,
        ),
        Failure::EmptyContent => Classification::new(
            InvalidContent,
            false,
            Severity::Low,
            Abort,
            "content is empty",
            "Please provide some text to analyze",
        ),
        Failure::ContentTooShort { .. } => Classification::new(
            InvalidContent,
            false,
            Severity::Low,
            Abort,
            "content below minimum length",
            "Please provide a longer piece of text to analyze",
        ),
        Failure::Cancelled => Classification::new(
            NetworkError,
            false,
            Severity::Low,
            Abort,
            "analysis cancelled",
            "The analysis was cancelled",
        ),
    }
}

fn classify_status(status: u16) -> Classification {
    use ErrorKind::*;
    use RecoveryStrategy::*;

    match status {
        429 => Classification::new(
            RateLimited,
            true,
            Severity::Medium,
            Retry,
            "provider rate limit exceeded",
            "Please wait a moment before trying again",
        ),
        500..=599 => Classification::new(
            ApiUnavailable,
            true,
            Severity::High,
            Retry,
            format!("analysis service temporarily unavailable (HTTP {})", status),
            "Please try again in a few minutes",
        ),
        404 => Classification::new(
            ApiUnavailable,
            false,
            Severity::High,
            Fallback,
            "provider endpoint not found (HTTP 404)",
            "Using fallback analysis method",
        ),
        400 => Classification::new(
            InvalidContent,
            false,
            Severity::Medium,
            Abort,
            "provider rejected the request (HTTP 400)",
            "Please try with different content or check your input",
        ),
        401..=499 => Classification::new(
            ApiUnavailable,
            false,
            Severity::High,
            Abort,
            format!("provider request failed (HTTP {})", status),
            "Please check your request and try again",
        ),
        _ => Classification::new(
            NetworkError,
            true,
            Severity::Medium,
            Retry,
            format!("unexpected provider response (HTTP {})", status),
            "Please check your internet connection and try again",
        ),
    }
}
