//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use credibility::AnalysisOrchestrator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::routes::{
    analyze_article_handler, analyze_long_text_handler, analyze_short_text_handler,
    health_handler, not_found_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
}

/// Build the Axum application router
pub fn build_app(orchestrator: AnalysisOrchestrator) -> Router {
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
    };

    // CORS configuration - any origin, as browser extensions call this directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/analyze/article", post(analyze_article_handler))
        .route("/analyze/text/short", post(analyze_short_text_handler))
        .route("/analyze/text/long", post(analyze_long_text_handler))
        .fallback(not_found_handler)
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
