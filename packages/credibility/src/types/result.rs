//! Analysis output.
//!
//! [`Assessment`] and [`ShortAssessment`] are what the provider contributes,
//! after validation. [`Stamped`] adds the identifiers the orchestrator owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reasons grouped by classification. Any list may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reasoning {
    pub factual: Vec<String>,
    pub unfactual: Vec<String>,
    pub subjective: Vec<String>,
    pub objective: Vec<String>,
}

impl Reasoning {
    pub fn is_empty(&self) -> bool {
        self.factual.is_empty()
            && self.unfactual.is_empty()
            && self.subjective.is_empty()
            && self.objective.is_empty()
    }
}

/// Percentages in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    pub factuality: u8,
    pub objectivity: u8,
}

/// Validated full assessment (Article and LongText variants).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub reasoning: Reasoning,
    pub credibility_score: u8,
    pub categories: Categories,
    pub confidence: u8,
    pub sources: Vec<String>,

    /// True only for synthesized placeholders
    #[serde(default)]
    pub degraded: bool,
}

/// Exactly one short-text classification with its explanation.
///
/// Serializes as a single-key object, e.g. `{"fact": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShortVerdict {
    #[serde(rename = "fact")]
    Fact(String),
    #[serde(rename = "false")]
    False(String),
    #[serde(rename = "opinion")]
    Opinion(String),
    #[serde(rename = "none")]
    NoClaim(String),
}

impl ShortVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            ShortVerdict::Fact(_) => "fact",
            ShortVerdict::False(_) => "false",
            ShortVerdict::Opinion(_) => "opinion",
            ShortVerdict::NoClaim(_) => "none",
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            ShortVerdict::Fact(s)
            | ShortVerdict::False(s)
            | ShortVerdict::Opinion(s)
            | ShortVerdict::NoClaim(s) => s,
        }
    }
}

/// Validated short-text assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortAssessment {
    pub analysis: ShortVerdict,
    pub confidence: u8,
    pub sources: Vec<String>,
    #[serde(default)]
    pub degraded: bool,
}

/// An assessment with orchestrator-assigned identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamped<T> {
    /// Unique per analysis call
    pub id: Uuid,

    /// When the call was made
    pub timestamp: DateTime<Utc>,

    /// Deterministic fingerprint of normalized content and URL
    pub content_hash: String,

    #[serde(flatten)]
    pub body: T,
}

impl<T> Stamped<T> {
    pub fn new(body: T, content_hash: impl Into<String>) -> Self {
        Self::at(body, content_hash, Utc::now())
    }

    /// Stamp with an explicit call time.
    pub fn at(body: T, content_hash: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp,
            content_hash: content_hash.into(),
            body,
        }
    }
}

/// Article / LongText result.
pub type AnalysisResult = Stamped<Assessment>;

/// ShortText result.
pub type ShortAnalysisResult = Stamped<ShortAssessment>;

/// What an orchestrated call returns on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Full(AnalysisResult),
    Short(ShortAnalysisResult),
}

impl AnalysisOutcome {
    pub fn is_degraded(&self) -> bool {
        match self {
            AnalysisOutcome::Full(r) => r.body.degraded,
            AnalysisOutcome::Short(r) => r.body.degraded,
        }
    }

    pub fn content_hash(&self) -> &str {
        match self {
            AnalysisOutcome::Full(r) => &r.content_hash,
            AnalysisOutcome::Short(r) => &r.content_hash,
        }
    }

    pub fn into_full(self) -> Option<AnalysisResult> {
        match self {
            AnalysisOutcome::Full(r) => Some(r),
            AnalysisOutcome::Short(_) => None,
        }
    }

    pub fn into_short(self) -> Option<ShortAnalysisResult> {
        match self {
            AnalysisOutcome::Short(r) => Some(r),
            AnalysisOutcome::Full(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_verdict_single_key_object() {
        let value = serde_json::to_value(ShortVerdict::False("It is not.".into())).unwrap();
        assert_eq!(value, serde_json::json!({"false": "It is not."}));

        let value = serde_json::to_value(ShortVerdict::NoClaim("Gibberish".into())).unwrap();
        assert_eq!(value, serde_json::json!({"none": "Gibberish"}));
    }

    #[test]
    fn test_stamped_flattens_body() {
        let result = Stamped::new(
            Assessment {
                reasoning: Reasoning::default(),
                credibility_score: 85,
                categories: Categories {
                    factuality: 90,
                    objectivity: 70,
                },
                confidence: 80,
                sources: vec![],
                degraded: false,
            },
            "abc",
        );

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["credibilityScore"], 85);
        assert_eq!(value["categories"]["objectivity"], 70);
        assert_eq!(value["contentHash"], "abc");
        assert_eq!(value["degraded"], false);
        assert!(value["id"].is_string());
        assert!(value.get("body").is_none());
    }

    #[test]
    fn test_stamped_ids_are_unique() {
        let a = Stamped::new((), "h");
        let b = Stamped::new((), "h");
        assert_ne!(a.id, b.id);
    }
}
