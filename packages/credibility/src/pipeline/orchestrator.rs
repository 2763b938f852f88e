//! Entry point for one analysis call.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::config::{AnalyzerConfig, ConfigError};
use crate::error::{ErrorRecord, Failure, Result};
use crate::pipeline::content::{char_len, content_hash, normalize_content};
use crate::pipeline::degrade::DegradationService;
use crate::pipeline::prompts;
use crate::pipeline::retry::{RetryController, RetryPolicy};
use crate::traits::Provider;
use crate::types::{AnalysisOutcome, AnalysisRequest, Assessment, ShortAssessment, Stamped};

/// Minimum normalized content length, in characters.
pub const MIN_CONTENT_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorOptions {
    pub retry: RetryPolicy,
    pub allow_degraded: bool,
    pub min_content_chars: usize,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            allow_degraded: true,
            min_content_chars: MIN_CONTENT_CHARS,
        }
    }
}

/// Validates input, shapes it, runs the retry loop and stamps the result.
///
/// Holds no per-request state; one instance serves concurrent calls.
#[derive(Clone)]
pub struct AnalysisOrchestrator {
    provider: Arc<dyn Provider>,
    retry: RetryController,
    degradation: DegradationService,
    min_content_chars: usize,
}

impl AnalysisOrchestrator {
    pub fn new(provider: Arc<dyn Provider>, options: OrchestratorOptions) -> Self {
        let degradation = DegradationService::default();
        Self {
            provider,
            retry: RetryController::new(options.retry, degradation, options.allow_degraded),
            degradation,
            min_content_chars: options.min_content_chars,
        }
    }

    /// Build the configured provider and wrap it.
    pub fn from_config(config: &AnalyzerConfig) -> std::result::Result<Self, ConfigError> {
        let provider = config.build_provider()?;
        Ok(Self::new(provider, config.options()))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
        self.analyze_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Like [`analyze`](Self::analyze), but gives up as soon as `cancel`
    /// fires: the in-flight provider call is dropped and no retry follows.
    #[instrument(
        skip(self, request, cancel),
        fields(provider = self.provider.name(), variant = request.variant.as_str())
    )]
    pub async fn analyze_with_cancel(
        &self,
        request: &AnalysisRequest,
        cancel: CancellationToken,
    ) -> Result<AnalysisOutcome> {
        let called_at = Utc::now();
        let normalized = normalize_content(&request.content);
        let chars = char_len(&normalized);
        if chars == 0 {
            return Err(ErrorRecord::from(Failure::EmptyContent));
        }
        if chars < self.min_content_chars {
            return Err(ErrorRecord::from(Failure::ContentTooShort {
                chars,
                min: self.min_content_chars,
            }));
        }

        let hash = content_hash(&normalized, request.url.as_deref());
        let shaped = self.degradation.shape_input(&normalized);
        let prompt = prompts::build(request.variant, &shaped.content, request.title.as_deref());

        let outcome = if request.variant.is_short() {
            let run = self
                .retry
                .run::<ShortAssessment>(self.provider.as_ref(), &prompt, &cancel)
                .await?;
            info!(
                attempts = run.attempts,
                degraded = run.value.degraded,
                verdict = run.value.analysis.label(),
                "Short analysis complete"
            );
            AnalysisOutcome::Short(Stamped::at(run.value, hash, called_at))
        } else {
            let run = self
                .retry
                .run::<Assessment>(self.provider.as_ref(), &prompt, &cancel)
                .await?;
            info!(
                attempts = run.attempts,
                degraded = run.value.degraded,
                credibility_score = run.value.credibility_score,
                "Analysis complete"
            );
            AnalysisOutcome::Full(Stamped::at(run.value, hash, called_at))
        };

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::MockProvider;

    const VALID: &str = r#"{"credibilityScore":85,"categories":{"factuality":90,"objectivity":70},"confidence":80,"reasoning":{"factual":["x"],"unfactual":[],"subjective":[],"objective":[]},"sources":[]}"#;

    fn long_content() -> String {
        "The city council approved the new transit budget on Tuesday evening.".to_string()
    }

    #[tokio::test]
    async fn test_short_content_rejected_before_call() {
        let provider = Arc::new(MockProvider::new().respond(VALID));
        let orchestrator = AnalysisOrchestrator::new(provider.clone(), OrchestratorOptions::default());

        let err = orchestrator
            .analyze(&AnalysisRequest::long_text("too short"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidContent);
        assert!(!err.retryable);
        assert_eq!(err.attempt, 0);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_only_is_empty() {
        let provider = Arc::new(MockProvider::new());
        let orchestrator = AnalysisOrchestrator::new(provider.clone(), OrchestratorOptions::default());

        let err = orchestrator
            .analyze(&AnalysisRequest::short_text(" \n\t "))
            .await
            .unwrap_err();
        assert_eq!(err.failure(), &Failure::EmptyContent);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_article_prompt_carries_title_not_url() {
        let provider = Arc::new(MockProvider::new().respond(VALID));
        let orchestrator = AnalysisOrchestrator::new(provider.clone(), OrchestratorOptions::default());

        let request = AnalysisRequest::article(
            long_content(),
            Some("Transit budget passes".into()),
            Some("https://news.example.com/transit".into()),
            None,
        );
        let outcome = orchestrator.analyze(&request).await.unwrap();
        assert!(!outcome.is_degraded());

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].user_prompt.contains("Transit budget passes"));
        assert!(!calls[0].user_prompt.contains("news.example.com"));
    }

    #[tokio::test]
    async fn test_hash_uses_normalized_content_and_url() {
        let provider = Arc::new(MockProvider::new().respond(VALID).respond(VALID));
        let orchestrator = AnalysisOrchestrator::new(provider, OrchestratorOptions::default());

        let a = orchestrator
            .analyze(&AnalysisRequest::long_text(long_content()))
            .await
            .unwrap();
        let b = orchestrator
            .analyze(&AnalysisRequest::long_text(format!("  {}  \n\n", long_content())))
            .await
            .unwrap();

        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a.content_hash(), content_hash(&long_content(), None));
    }

    #[tokio::test]
    async fn test_short_variant_returns_short_result() {
        let provider = Arc::new(
            MockProvider::new().respond(r#"{"analysis":{"opinion":"A matter of taste."},"confidence":90,"sources":[]}"#),
        );
        let orchestrator = AnalysisOrchestrator::new(provider, OrchestratorOptions::default());

        let outcome = orchestrator
            .analyze(&AnalysisRequest::short_text(
                "Pineapple is the best pizza topping and anyone who disagrees is wrong.",
            ))
            .await
            .unwrap();

        let short = outcome.into_short().unwrap();
        assert_eq!(short.body.analysis.label(), "opinion");
        assert_eq!(short.body.confidence, 90);
    }

    #[tokio::test]
    async fn test_timestamp_is_call_time() {
        let provider = Arc::new(
            MockProvider::new()
                .respond(VALID)
                .with_delay(std::time::Duration::from_millis(200)),
        );
        let orchestrator = AnalysisOrchestrator::new(provider, OrchestratorOptions::default());

        let before = Utc::now();
        let result = orchestrator
            .analyze(&AnalysisRequest::long_text(long_content()))
            .await
            .unwrap()
            .into_full()
            .unwrap();
        let after = Utc::now();

        assert!(result.timestamp >= before);
        assert!(after - result.timestamp >= chrono::Duration::milliseconds(200));
    }
}
