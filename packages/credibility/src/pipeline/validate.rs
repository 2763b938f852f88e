//! Schema validation and normalization of extracted provider JSON.
//!
//! Deserialization is deliberately lenient (missing fields default, floats
//! round, `null` entries are skipped); the checks afterwards are strict.

use serde::{Deserialize, Deserializer};

use crate::error::Failure;
use crate::types::{Assessment, Categories, Reasoning, ShortAssessment, ShortVerdict};

/// A result shape that can be validated from an extracted JSON object.
pub trait ResponseSchema: Sized {
    fn validate(json: &str) -> Result<Self, Failure>;
}

// =============================================================================
// Raw shapes
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAssessment {
    #[serde(default)]
    reasoning: Option<RawReasoning>,
    #[serde(default, deserialize_with = "lenient_int")]
    credibility_score: i64,
    #[serde(default)]
    categories: Option<RawCategories>,
    #[serde(default, deserialize_with = "lenient_int")]
    confidence: i64,
    #[serde(default)]
    sources: Option<Vec<Option<String>>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawReasoning {
    #[serde(default)]
    factual: Option<Vec<Option<String>>>,
    #[serde(default)]
    unfactual: Option<Vec<Option<String>>>,
    #[serde(default)]
    subjective: Option<Vec<Option<String>>>,
    #[serde(default)]
    objective: Option<Vec<Option<String>>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCategories {
    #[serde(default, deserialize_with = "lenient_int")]
    factuality: i64,
    #[serde(default, deserialize_with = "lenient_int")]
    objectivity: i64,
}

#[derive(Debug, Default, Deserialize)]
struct RawShortAssessment {
    #[serde(default)]
    analysis: Option<RawVerdicts>,
    #[serde(default, deserialize_with = "lenient_int")]
    confidence: i64,
    #[serde(default)]
    sources: Option<Vec<Option<String>>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawVerdicts {
    #[serde(default)]
    fact: Option<Explanation>,
    #[serde(default, rename = "false")]
    falsehood: Option<Explanation>,
    #[serde(default)]
    opinion: Option<Explanation>,
    #[serde(default)]
    none: Option<Explanation>,
}

/// Models return verdict explanations as a string or as a list of strings;
/// `null` list entries are skipped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Explanation {
    Text(String),
    Lines(Vec<Option<String>>),
}

impl Explanation {
    /// Joined, trimmed text; `None` when blank.
    fn into_text(self) -> Option<String> {
        let text = match self {
            Explanation::Text(s) => s.trim().to_string(),
            Explanation::Lines(lines) => lines
                .iter()
                .flatten()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Integer or float (rounded); `null` reads as 0.
fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(match number {
        None => 0,
        Some(n) => match n.as_i64() {
            Some(v) => v,
            None => n.as_f64().map(|f| f.round() as i64).unwrap_or(i64::MAX),
        },
    })
}

// =============================================================================
// Normalization helpers
// =============================================================================

/// Drop `null` and blank entries, trim the rest.
fn clean_list(list: Option<Vec<Option<String>>>) -> Vec<String> {
    list.unwrap_or_default()
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn percentage(field: &'static str, value: i64) -> Result<u8, Failure> {
    if (0..=100).contains(&value) {
        Ok(value as u8)
    } else {
        Err(Failure::OutOfRange { field, value })
    }
}

fn parse<'a, T: Deserialize<'a>>(json: &'a str) -> Result<T, Failure> {
    serde_json::from_str(json).map_err(|e| Failure::Malformed {
        detail: e.to_string(),
    })
}

// =============================================================================
// Full assessment
// =============================================================================

impl ResponseSchema for Assessment {
    fn validate(json: &str) -> Result<Self, Failure> {
        let raw: RawAssessment = parse(json)?;

        let reasoning = raw.reasoning.unwrap_or_default();
        let reasoning = Reasoning {
            factual: clean_list(reasoning.factual),
            unfactual: clean_list(reasoning.unfactual),
            subjective: clean_list(reasoning.subjective),
            objective: clean_list(reasoning.objective),
        };
        let categories = raw.categories.unwrap_or_default();

        let all_zero = raw.credibility_score == 0
            && raw.confidence == 0
            && categories.factuality == 0
            && categories.objectivity == 0;
        if all_zero && reasoning.is_empty() {
            return Err(Failure::Degenerate);
        }

        let credibility_score = percentage("credibilityScore", raw.credibility_score)?;
        let confidence = percentage("confidence", raw.confidence)?;
        let factuality = percentage("categories.factuality", categories.factuality)?;
        let objectivity = percentage("categories.objectivity", categories.objectivity)?;

        Ok(Assessment {
            reasoning,
            credibility_score,
            categories: Categories {
                factuality,
                objectivity,
            },
            confidence,
            sources: clean_list(raw.sources),
            degraded: false,
        })
    }
}

// =============================================================================
// Short assessment
// =============================================================================

impl ResponseSchema for ShortAssessment {
    fn validate(json: &str) -> Result<Self, Failure> {
        let raw: RawShortAssessment = parse(json)?;

        let confidence = percentage("confidence", raw.confidence)?;

        let verdicts = raw.analysis.unwrap_or_default();
        let mut populated: Vec<ShortVerdict> = [
            verdicts.fact.and_then(Explanation::into_text).map(ShortVerdict::Fact),
            verdicts
                .falsehood
                .and_then(Explanation::into_text)
                .map(ShortVerdict::False),
            verdicts
                .opinion
                .and_then(Explanation::into_text)
                .map(ShortVerdict::Opinion),
            verdicts
                .none
                .and_then(Explanation::into_text)
                .map(ShortVerdict::NoClaim),
        ]
        .into_iter()
        .flatten()
        .collect();

        let analysis = match populated.len() {
            0 => return Err(Failure::Degenerate),
            1 => populated.remove(0),
            count => return Err(Failure::ConflictingVerdicts { count }),
        };

        Ok(ShortAssessment {
            analysis,
            confidence,
            sources: clean_list(raw.sources),
            degraded: false,
        })
    }
}
