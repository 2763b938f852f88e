//! Input shaping and degraded fallback results.

use crate::error::ErrorRecord;
use crate::pipeline::content::char_len;
use crate::types::{Assessment, Categories, Reasoning, ShortAssessment, ShortVerdict};

/// Content longer than this (in characters) is truncated.
pub const PRECHECK_CHARS: usize = 5_000;

/// Characters kept when truncating.
pub const LIMIT_CHARS: usize = 4_000;

/// How far back from the limit to look for a word boundary.
const BOUNDARY_WINDOW: usize = 200;

pub const TRUNCATION_MARKER: &str = "\n[content truncated]";

const NEUTRAL_SCORE: u8 = 50;
const DEGRADED_CONFIDENCE: u8 = 10;

/// Content as it will be sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedInput {
    pub content: String,
    pub truncated: bool,
    pub original_chars: usize,
}

/// A result type that has a clearly-marked placeholder form.
pub trait Degradable {
    fn degraded(cause: &ErrorRecord) -> Self;
}

fn unavailable_notice(cause: &ErrorRecord) -> String {
    format!(
        "Analysis service unavailable ({}); this is a degraded placeholder, not a real assessment.",
        cause.kind
    )
}

impl Degradable for Assessment {
    fn degraded(cause: &ErrorRecord) -> Self {
        Assessment {
            reasoning: Reasoning {
                subjective: vec![unavailable_notice(cause)],
                ..Reasoning::default()
            },
            credibility_score: NEUTRAL_SCORE,
            categories: Categories {
                factuality: NEUTRAL_SCORE,
                objectivity: NEUTRAL_SCORE,
            },
            confidence: DEGRADED_CONFIDENCE,
            sources: Vec::new(),
            degraded: true,
        }
    }
}

impl Degradable for ShortAssessment {
    fn degraded(cause: &ErrorRecord) -> Self {
        ShortAssessment {
            analysis: ShortVerdict::NoClaim(unavailable_notice(cause)),
            confidence: DEGRADED_CONFIDENCE,
            sources: Vec::new(),
            degraded: true,
        }
    }
}

/// Truncation of oversized input and construction of fallback results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegradationService {
    precheck_chars: usize,
    limit_chars: usize,
}

impl Default for DegradationService {
    fn default() -> Self {
        Self {
            precheck_chars: PRECHECK_CHARS,
            limit_chars: LIMIT_CHARS,
        }
    }
}

impl DegradationService {
    /// Prepare normalized content for submission.
    pub fn shape_input(&self, normalized: &str) -> ShapedInput {
        let original_chars = char_len(normalized);
        if original_chars <= self.precheck_chars {
            return ShapedInput {
                content: normalized.to_string(),
                truncated: false,
                original_chars,
            };
        }

        let content = self.truncate(normalized);
        tracing::info!(
            original_chars,
            kept_chars = char_len(&content),
            "Truncated oversized content"
        );
        ShapedInput {
            content,
            truncated: true,
            original_chars,
        }
    }

    /// Deterministic truncation; content within the pre-check bound is
    /// returned unchanged, so the operation is idempotent.
    pub fn truncate(&self, content: &str) -> String {
        if char_len(content) <= self.precheck_chars {
            return content.to_string();
        }

        let cut = content
            .char_indices()
            .nth(self.limit_chars)
            .map(|(i, _)| i)
            .unwrap_or(content.len());
        let head = &content[..cut];

        let window_start = head
            .char_indices()
            .rev()
            .nth(BOUNDARY_WINDOW.saturating_sub(1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let head = match head[window_start..].rfind(char::is_whitespace) {
            Some(pos) => &head[..window_start + pos],
            None => head,
        };

        let mut out = head.trim_end().to_string();
        out.push_str(TRUNCATION_MARKER);
        out
    }

    pub fn fallback<T: Degradable>(&self, cause: &ErrorRecord) -> T {
        T::degraded(cause)
    }
}
