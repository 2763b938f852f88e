//! The analysis pipeline.
//!
//! Orchestrator -> retry controller -> provider -> extractor -> validator,
//! with failures routed through the classifier and, when allowed, the
//! degradation service.

pub mod classify;
pub mod content;
pub mod degrade;
pub mod extract;
pub mod orchestrator;
pub mod prompts;
pub mod retry;
pub mod validate;

pub use classify::{ErrorClassifier, RecoveryStrategy, RecoveryVerdict, Severity, MAX_BACKOFF};
pub use content::{content_hash, normalize_content};
pub use degrade::{Degradable, DegradationService, ShapedInput, TRUNCATION_MARKER};
pub use extract::extract_json_object;
pub use orchestrator::{AnalysisOrchestrator, OrchestratorOptions, MIN_CONTENT_CHARS};
pub use prompts::Prompt;
pub use retry::{Attempted, RetryController, RetryPolicy};
pub use validate::ResponseSchema;
