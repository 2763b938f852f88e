//! Provider adapters.
//!
//! Each adapter performs exactly one round trip per `complete` call and
//! reports every failure as a classified [`ErrorRecord`](crate::ErrorRecord).
//! Retrying is the retry controller's job, never the adapter's.

use std::time::Duration;

pub mod gemini;
pub mod pollinations;

pub use gemini::GeminiProvider;
pub use pollinations::PollinationsProvider;

/// Fixed per-call timeout.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);
