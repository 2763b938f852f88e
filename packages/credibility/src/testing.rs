//! Testing utilities.
//!
//! [`MockProvider`] lets applications exercise the full pipeline without
//! network calls: script raw responses and failures, then assert on the
//! prompts that were sent.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ErrorRecord, Failure, Result};
use crate::traits::Provider;

/// Record of one `complete` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Scripted provider.
///
/// Each call pops the next scripted step. An exhausted script answers with a
/// transport failure, so a test that calls more often than it scripted fails
/// loudly.
#[derive(Default, Clone)]
pub struct MockProvider {
    script: Arc<Mutex<VecDeque<std::result::Result<String, Failure>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
    delay: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw text response.
    pub fn respond(self, raw: impl Into<String>) -> Self {
        lock(&self.script).push_back(Ok(raw.into()));
        self
    }

    /// Queue a failure.
    pub fn fail(self, failure: Failure) -> Self {
        lock(&self.script).push_back(Err(failure));
        self
    }

    /// Queue the same failure `times` times.
    pub fn fail_times(self, failure: Failure, times: usize) -> Self {
        {
            let mut script = lock(&self.script);
            for _ in 0..times {
                script.push_back(Err(failure.clone()));
            }
        }
        self
    }

    /// Sleep before answering each call (virtual time under a paused clock).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Scripted steps not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        lock(&self.calls).push(MockCall {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
        });

        let step = lock(&self.script).pop_front();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match step {
            Some(Ok(raw)) => Ok(raw),
            Some(Err(failure)) => Err(ErrorRecord::from(failure)),
            None => Err(ErrorRecord::from(Failure::Transport {
                detail: "mock provider script exhausted".to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_script_order_and_call_log() {
        let provider = MockProvider::new()
            .respond("first")
            .fail(Failure::HttpStatus { status: 429 });

        assert_eq!(provider.complete("s1", "u1").await.unwrap(), "first");
        let err = provider.complete("s2", "u2").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::RateLimited);

        let err = provider.complete("s3", "u3").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NetworkError);

        let calls = provider.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].user_prompt, "u2");
        assert_eq!(provider.remaining(), 0);
    }
}
