//! Analysis input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three supported analysis shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// News article with headline; full result
    Article,
    /// Free text passage; full result
    LongText,
    /// Single claim; fact/false/opinion/none verdict
    ShortText,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Article => "article",
            Variant::LongText => "long_text",
            Variant::ShortText => "short_text",
        }
    }

    /// Whether this variant produces a short verdict instead of a full result.
    pub fn is_short(&self) -> bool {
        matches!(self, Variant::ShortText)
    }
}

/// One piece of text to assess.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub content: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub last_edited: Option<DateTime<Utc>>,
    pub variant: Variant,
}

impl AnalysisRequest {
    /// Article with optional headline, source URL and edit time.
    pub fn article(
        content: impl Into<String>,
        title: Option<String>,
        url: Option<String>,
        last_edited: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            content: content.into(),
            title,
            url,
            last_edited,
            variant: Variant::Article,
        }
    }

    pub fn long_text(content: impl Into<String>) -> Self {
        Self::text(content, Variant::LongText)
    }

    pub fn short_text(content: impl Into<String>) -> Self {
        Self::text(content, Variant::ShortText)
    }

    fn text(content: impl Into<String>, variant: Variant) -> Self {
        Self {
            content: content.into(),
            title: None,
            url: None,
            last_edited: None,
            variant,
        }
    }
}
