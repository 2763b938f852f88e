//! Provider trait for one round trip to a generative-AI backend.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// One blocking request/response against an AI backend.
///
/// Implementations perform exactly one outbound call per `complete` and
/// never retry internally. Every failure is returned as an
/// [`ErrorRecord`](crate::error::ErrorRecord); vendor error types stay inside
/// the implementation.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short identifier used in logs (e.g. "gemini").
    fn name(&self) -> &'static str;

    /// Send the prompts and return the raw model text.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        (**self).complete(system_prompt, user_prompt).await
    }
}
