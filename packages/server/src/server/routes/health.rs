use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::app::AppState;
use crate::server::response::ApiResponse;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    provider: String,
    timestamp: DateTime<Utc>,
}

/// Liveness only; the provider is not contacted.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        provider: state.orchestrator.provider_name().to_string(),
        timestamp: Utc::now(),
    }))
}
