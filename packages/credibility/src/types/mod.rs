//! Request and result types.

pub mod request;
pub mod result;

pub use request::{AnalysisRequest, Variant};
pub use result::{
    AnalysisOutcome, AnalysisResult, Assessment, Categories, Reasoning, ShortAnalysisResult,
    ShortAssessment, ShortVerdict, Stamped,
};
