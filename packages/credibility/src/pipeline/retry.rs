//! Bounded retry loop over provider call, extraction and validation.
//!
//! One [`RetryController::run`] call is one request's state machine:
//! attempt, classify on failure, then sleep and retry, degrade, or give up.
//! Nothing carries over between runs.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{ErrorRecord, Failure, Result};
use crate::pipeline::classify::{ErrorClassifier, RecoveryStrategy, MAX_ATTEMPTS, MAX_BACKOFF};
use crate::pipeline::degrade::{Degradable, DegradationService};
use crate::pipeline::extract::extract_json_object;
use crate::pipeline::prompts::Prompt;
use crate::pipeline::validate::ResponseSchema;
use crate::traits::Provider;

const PREVIEW_CHARS: usize = 200;

/// Attempt budget and backoff base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// `max_attempts` is clamped to `1..=3`.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.clamp(1, MAX_ATTEMPTS),
            base_delay,
        }
    }
}

/// A successful run.
#[derive(Debug, Clone)]
pub struct Attempted<T> {
    pub value: T,

    /// Provider calls made
    pub attempts: u32,

    /// Set when `value` is a degraded placeholder
    pub degraded_from: Option<ErrorRecord>,
}

#[derive(Debug, Clone, Copy)]
pub struct RetryController {
    classifier: ErrorClassifier,
    degradation: DegradationService,
    allow_degraded: bool,
}

impl RetryController {
    pub fn new(policy: RetryPolicy, degradation: DegradationService, allow_degraded: bool) -> Self {
        Self {
            classifier: ErrorClassifier::new(policy.base_delay, policy.max_attempts),
            degradation,
            allow_degraded,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.classifier.max_attempts()
    }

    /// Drive attempts until success, a terminal verdict, or cancellation.
    pub async fn run<T>(
        &self,
        provider: &dyn Provider,
        prompt: &Prompt,
        cancel: &CancellationToken,
    ) -> Result<Attempted<T>>
    where
        T: ResponseSchema + Degradable,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(provider = provider.name(), attempt, "Calling provider");

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ErrorRecord::from(Failure::Cancelled)),
                outcome = attempt_once::<T>(provider, prompt) => outcome,
            };

            let error = match outcome {
                Ok(value) => {
                    if attempt > 1 {
                        info!(provider = provider.name(), attempt, "Provider call succeeded after retry");
                    }
                    return Ok(Attempted {
                        value,
                        attempts: attempt,
                        degraded_from: None,
                    });
                }
                Err(e) => e.at_attempt(attempt),
            };

            let verdict = self.classifier.verdict(&error);
            warn!(
                provider = provider.name(),
                attempt,
                kind = %error.kind,
                strategy = ?verdict.strategy,
                severity = ?verdict.severity,
                error = %error.message,
                failure = ?error.failure,
                "Analysis attempt failed"
            );

            match verdict.strategy {
                RecoveryStrategy::Retry if verdict.retryable => {
                    let delay = verdict.backoff_delay.min(MAX_BACKOFF);
                    debug!(attempt, delay_ms = delay.as_millis() as u64, "Backing off");
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            return Err(ErrorRecord::from(Failure::Cancelled).at_attempt(attempt));
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                RecoveryStrategy::Fallback | RecoveryStrategy::Degrade if self.allow_degraded => {
                    info!(
                        provider = provider.name(),
                        attempt,
                        kind = %error.kind,
                        "Returning degraded result"
                    );
                    return Ok(Attempted {
                        value: self.degradation.fallback(&error),
                        attempts: attempt,
                        degraded_from: Some(error),
                    });
                }
                _ => return Err(error),
            }
        }
    }
}

async fn attempt_once<T: ResponseSchema>(provider: &dyn Provider, prompt: &Prompt) -> Result<T> {
    let raw = provider.complete(&prompt.system, &prompt.user).await?;
    let preview: String = raw.chars().take(PREVIEW_CHARS).collect();
    debug!(
        provider = provider.name(),
        response_len = raw.len(),
        preview = %preview,
        "Raw provider response"
    );

    let json = extract_json_object(&raw)?;
    Ok(T::validate(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::MockProvider;
    use crate::types::{Assessment, ShortAssessment};

    const VALID: &str = r#"{"credibilityScore":70,"categories":{"factuality":70,"objectivity":60},"confidence":75,"reasoning":{"factual":["ok"]},"sources":[]}"#;

    fn prompt() -> Prompt {
        Prompt {
            system: "system".into(),
            user: "user".into(),
        }
    }

    fn controller(allow_degraded: bool) -> RetryController {
        RetryController::new(RetryPolicy::default(), DegradationService::default(), allow_degraded)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_attempt() {
        let provider = MockProvider::new().respond(VALID);
        let run = controller(true)
            .run::<Assessment>(&provider, &prompt(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(run.attempts, 1);
        assert!(run.degraded_from.is_none());
        assert_eq!(run.value.credibility_score, 70);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_invalid_response() {
        let provider = MockProvider::new()
            .respond("no json at all")
            .respond(VALID);
        let run = controller(true)
            .run::<Assessment>(&provider, &prompt(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(run.attempts, 2);
        assert!(!run.value.degraded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_exhausts_and_degrades() {
        let provider = MockProvider::new().fail_times(Failure::HttpStatus { status: 429 }, 3);
        let start = tokio::time::Instant::now();

        let run = controller(true)
            .run::<Assessment>(&provider, &prompt(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 3);
        assert_eq!(run.attempts, 3);
        assert!(run.value.degraded);
        let cause = run.degraded_from.unwrap();
        assert_eq!(cause.kind, ErrorKind::RateLimited);
        assert_eq!(cause.attempt, 3);
        // 1s + 2s of backoff between three attempts
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_without_degradation_surfaces_error() {
        let provider = MockProvider::new().fail_times(Failure::HttpStatus { status: 503 }, 3);
        let err = controller(false)
            .run::<Assessment>(&provider, &prompt(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::ApiUnavailable);
        assert_eq!(err.attempt, 3);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_stops_immediately() {
        let provider = MockProvider::new()
            .fail(Failure::HttpStatus { status: 400 })
            .respond(VALID);
        let err = controller(true)
            .run::<Assessment>(&provider, &prompt(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidContent);
        assert!(!err.retryable);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_falls_back_without_retry() {
        let provider = MockProvider::new().fail(Failure::HttpStatus { status: 404 });
        let run = controller(true)
            .run::<ShortAssessment>(&provider, &prompt(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 1);
        assert!(run.value.degraded);
        assert_eq!(run.value.analysis.label(), "none");
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_policy() {
        let provider = MockProvider::new().fail_times(Failure::Timeout, 3);
        let controller = RetryController::new(
            RetryPolicy::new(1, Duration::from_secs(1)),
            DegradationService::default(),
            false,
        );
        let err = controller
            .run::<Assessment>(&provider, &prompt(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::NetworkError);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff() {
        let provider = MockProvider::new().fail_times(Failure::HttpStatus { status: 500 }, 3);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            trigger.cancel();
        });

        let err = controller(true)
            .run::<Assessment>(&provider, &prompt(), &cancel)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::NetworkError);
        assert!(!err.retryable);
        assert_eq!(err.failure(), &Failure::Cancelled);
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_policy_clamps_attempts() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
        assert_eq!(RetryPolicy::new(9, Duration::ZERO).max_attempts, 3);
    }
}
