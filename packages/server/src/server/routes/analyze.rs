use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use chrono::{DateTime, Utc};
use credibility::{AnalysisOutcome, AnalysisRequest};
use serde::Deserialize;

use crate::server::app::AppState;
use crate::server::response::{ApiError, ApiResponse};

#[derive(Debug, Deserialize)]
pub struct AnalyzeArticleBody {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub last_edited: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextBody {
    #[serde(default)]
    pub content: String,
}

type AnalysisResponse = Result<Json<ApiResponse<AnalysisOutcome>>, ApiError>;

async fn run(state: &AppState, request: AnalysisRequest) -> AnalysisResponse {
    tracing::debug!(
        variant = request.variant.as_str(),
        content_len = request.content.len(),
        "Analysis request received"
    );
    let outcome = state.orchestrator.analyze(&request).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// `POST /analyze/article`
pub async fn analyze_article_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<AnalyzeArticleBody>, JsonRejection>,
) -> AnalysisResponse {
    let Json(body) = body.map_err(|_| ApiError::InvalidBody)?;
    let request = AnalysisRequest::article(
        body.content,
        body.title.filter(|t| !t.trim().is_empty()),
        body.url.filter(|u| !u.trim().is_empty()),
        body.last_edited,
    );
    run(&state, request).await
}

/// `POST /analyze/text/long`
pub async fn analyze_long_text_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<AnalyzeTextBody>, JsonRejection>,
) -> AnalysisResponse {
    let Json(body) = body.map_err(|_| ApiError::InvalidBody)?;
    run(&state, AnalysisRequest::long_text(body.content)).await
}

/// `POST /analyze/text/short`
pub async fn analyze_short_text_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<AnalyzeTextBody>, JsonRejection>,
) -> AnalysisResponse {
    let Json(body) = body.map_err(|_| ApiError::InvalidBody)?;
    run(&state, AnalysisRequest::short_text(body.content)).await
}
