//! Prompt templates for the three analysis variants.

use crate::types::Variant;

/// Shared instructions: stance, verification and citation rules.
const ANALYST_PREAMBLE: &str = r#"You are an experienced fact-checker and content analyst with a background in journalism, research methods and information verification.
Judge the content on factuality and objectivity. Set your own biases aside: how popular or unpopular a claim is, and which side of a debate it favours, has no bearing on whether it is true.
Use web search to verify claims. Where a reason rests on something you verified, cite it with [n] at the end of the reason and list the matching "[n](url)" string in the sources field. Citations are optional, but never invent a source.
Do not take the content at its word. Verify claims independently and focus on whether what is stated is true, not on how it is phrased.

IMPORTANT: Reply with a single valid JSON object and nothing else. No text before or after it."#;

const FULL_RESPONSE_FORMAT: &str = r#"The "reasoning" field is an object with the keys "factual", "unfactual", "subjective" and "objective". Each maps to an array of short reasons for that classification; any array may be empty.
Be concise: at most 3 reasons per key and under 10 in total, about 10 words each, unless leaving something out would be misleading.

RESPONSE FORMAT:
{
  "reasoning": {
    "factual": ["reason", ...],
    "unfactual": ["reason", ...],
    "subjective": ["reason", ...],
    "objective": ["reason", ...]
  },
  "credibilityScore": <integer 0-100>,
  "categories": {
    "factuality": <integer 0-100>,
    "objectivity": <integer 0-100>
  },
  "confidence": <integer 0-100>,
  "sources": ["[1](https://...)", "[2](https://...)"]
}

SCORING:
credibilityScore
- 90-100: accurate
- 70-89: a few misleading statements that leave the main claim intact
- 50-69: misleading, or containing some factual errors
- 30-49: significantly misleading or inaccurate
- 0-29: inaccurate; the truth is unrelated or opposite to the main claim

categories
- factuality: how factually accurate the content is
- objectivity: plain event reporting is 100, a pure opinion piece is 0

confidence
- 90-100: clear indicators, very confident
- 70-89: confident, some uncertainty on details
- 50-69: mixed or ambiguous signals
- 30-49: too little information for a firm assessment
- 0-29: very uncertain, needs more context

CRITERIA:
1. Are claims attributed to credible sources?
2. Can statements be verified against reliable sources?
3. Is the reasoning logically consistent?
4. Is there political, commercial or ideological bias?
5. Is important context present or missing?
6. Does the language aim to inform or to manipulate?
7. Is the supporting evidence substantial and relevant?
8. Is the information current?"#;

const ARTICLE_NOTES: &str = r#"NOTES:
- The content is a news article. Judge the article's factuality, not the bias of each quoted source, unless the article presents a quote as settled truth.
- A public figure exaggerating in a quote does not make the article unfactual.
- Objectivity concerns the reporting, not the sources it cites.
- Compare the headline with the body; a misleading headline is a reason the article is unfactual.
- Consider whether normal journalistic standards are met."#;

const TEXT_NOTES: &str = r#"NOTES:
- The content is a passage of text. Judge whether what it states is true and how objectively it is presented."#;

const SHORT_INSTRUCTIONS: &str = r#"Decide whether the text is a fact, false, or an opinion. Answer "none" when the text is incomprehensible or makes no claim.
The "analysis" field is an object with exactly ONE of the keys "fact", "false", "opinion" or "none". Its value is a short string explaining the classification.

RESPONSE FORMAT:
{
  "analysis": {
    "fact": "explanation"
  },
  "confidence": <integer 0-100>,
  "sources": ["[1](https://...)"]
}

MEANING:
- fact: the statement is true
- false: the statement is inaccurate
- opinion: the text expresses an opinion rather than a factual claim
- none: none of the above; gibberish, or nothing is asserted

confidence
- 90-100: very confident
- 70-89: confident, some uncertainty on details
- 50-69: mixed or ambiguous signals
- 30-49: too little information for a firm assessment
- 0-29: very uncertain"#;

const CLOSING: &str = "Answer in the response format above.";

/// A system/user prompt pair for one analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Both prompts as one text, for providers that take a single prompt.
    pub fn combined(&self) -> String {
        format!("{}\n\n\n{}", self.system, self.user)
    }
}

/// Build the prompt for `variant`. `title` is only used for articles.
pub fn build(variant: Variant, content: &str, title: Option<&str>) -> Prompt {
    match variant {
        Variant::Article => Prompt {
            system: format!("{ANALYST_PREAMBLE}\n\n{FULL_RESPONSE_FORMAT}\n\n{ARTICLE_NOTES}"),
            user: format!(
                "Assess the credibility and factuality of this article.\n\nHEADLINE: \"{}\"\n\nARTICLE TEXT:\n\"\"\"\n{}\n\"\"\"\n\n{CLOSING}",
                title.map(str::trim).unwrap_or_default(),
                content
            ),
        },
        Variant::LongText => Prompt {
            system: format!("{ANALYST_PREAMBLE}\n\n{FULL_RESPONSE_FORMAT}\n\n{TEXT_NOTES}"),
            user: text_prompt(content),
        },
        Variant::ShortText => Prompt {
            system: format!("{ANALYST_PREAMBLE}\n\n{SHORT_INSTRUCTIONS}"),
            user: text_prompt(content),
        },
    }
}

fn text_prompt(content: &str) -> String {
    format!(
        "Assess the credibility and factuality of this text.\n\nTEXT:\n\"\"\"\n{}\n\"\"\"\n\n{CLOSING}",
        content
    )
}
