//! Router tests driven in-process through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use credibility::testing::MockProvider;
use credibility::{AnalysisOrchestrator, Failure, OrchestratorOptions};
use serde_json::{json, Value};
use server_core::server::build_app;
use tower::ServiceExt;

const FULL_RESPONSE: &str = r#"{"credibilityScore":85,"categories":{"factuality":90,"objectivity":70},"confidence":80,"reasoning":{"factual":["Matches the council's published minutes [1]"],"unfactual":[],"subjective":[],"objective":["Neutral tone"]},"sources":["[1](https://example.gov/minutes)"]}"#;

const ARTICLE_TEXT: &str = "The city council approved the new transit budget on Tuesday evening after a lengthy debate.";

fn app_with(provider: &Arc<MockProvider>, allow_degraded: bool) -> Router {
    let orchestrator = AnalysisOrchestrator::new(
        provider.clone(),
        OrchestratorOptions {
            allow_degraded,
            ..OrchestratorOptions::default()
        },
    );
    build_app(orchestrator)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn health_reports_provider() {
    let provider = Arc::new(MockProvider::new());
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app_with(&provider, true), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["provider"], "mock");
    assert!(body["data"]["timestamp"].is_string());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn analyze_article_returns_stamped_result() {
    let provider = Arc::new(MockProvider::new().respond(FULL_RESPONSE));
    let request = post_json(
        "/analyze/article",
        json!({
            "content": ARTICLE_TEXT,
            "title": "Council passes transit budget",
            "url": "https://news.example.com/transit",
            "last_edited": "2025-03-04T10:00:00Z"
        }),
    );

    let (status, body) = send(app_with(&provider, true), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["credibilityScore"], 85);
    assert_eq!(data["categories"]["factuality"], 90);
    assert_eq!(data["confidence"], 80);
    assert_eq!(data["sources"][0], "[1](https://example.gov/minutes)");
    assert_eq!(data["degraded"], false);
    assert!(data["id"].is_string());
    assert!(data["timestamp"].is_string());
    assert_eq!(data["contentHash"].as_str().unwrap().len(), 64);
    assert!(body.get("error").is_none());

    let calls = provider.calls();
    assert!(calls[0].user_prompt.contains("Council passes transit budget"));
}

#[tokio::test]
async fn analyze_short_text_returns_single_verdict() {
    let provider = Arc::new(MockProvider::new().respond(
        r#"{"analysis":{"false":["The Great Wall is not visible", "to the naked eye from orbit."]},"confidence":92,"sources":[]}"#,
    ));
    let request = post_json(
        "/analyze/text/short",
        json!({ "content": "The Great Wall of China is clearly visible from the Moon with the naked eye." }),
    );

    let (status, body) = send(app_with(&provider, true), request).await;

    assert_eq!(status, StatusCode::OK);
    let analysis = body["data"]["analysis"].as_object().unwrap();
    assert_eq!(analysis.len(), 1);
    assert_eq!(
        analysis["false"],
        "The Great Wall is not visible to the naked eye from orbit."
    );
    assert_eq!(body["data"]["confidence"], 92);
}

#[tokio::test]
async fn analyze_long_text_uses_full_shape() {
    let provider = Arc::new(MockProvider::new().respond(FULL_RESPONSE));
    let request = post_json("/analyze/text/long", json!({ "content": ARTICLE_TEXT }));

    let (status, body) = send(app_with(&provider, true), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reasoning"]["objective"][0], "Neutral tone");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let provider = Arc::new(MockProvider::new());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/analyze/text/long")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(app_with(&provider, true), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid request body");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn short_content_is_rejected_without_provider_call() {
    let provider = Arc::new(MockProvider::new().respond(FULL_RESPONSE));
    let request = post_json("/analyze/text/long", json!({ "content": "too short" }));

    let (status, body) = send(app_with(&provider, true), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "INVALID_CONTENT");
    assert_eq!(body["error"]["retryable"], false);
    assert!(body["error"]["userMessage"].is_string());
    assert_eq!(body["error"]["attempt"], 0);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn rate_limit_maps_to_429_when_degradation_disabled() {
    let provider = Arc::new(
        MockProvider::new().fail_times(Failure::HttpStatus { status: 429 }, 3),
    );
    let request = post_json("/analyze/text/long", json!({ "content": ARTICLE_TEXT }));

    let (status, body) = send(app_with(&provider, false), request).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["kind"], "RATE_LIMITED");
    assert_eq!(body["error"]["attempt"], 3);
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn rate_limit_degrades_by_default() {
    let provider = Arc::new(
        MockProvider::new().fail_times(Failure::HttpStatus { status: 429 }, 3),
    );
    let request = post_json("/analyze/text/long", json!({ "content": ARTICLE_TEXT }));

    let (status, body) = send(app_with(&provider, true), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["degraded"], true);
    assert_eq!(body["data"]["credibilityScore"], 50);
}

#[tokio::test]
async fn missing_credential_maps_to_503() {
    let provider = Arc::new(
        MockProvider::new().fail(Failure::MissingCredential { provider: "gemini" }),
    );
    let request = post_json("/analyze/text/long", json!({ "content": ARTICLE_TEXT }));

    let (status, body) = send(app_with(&provider, true), request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["kind"], "API_UNAVAILABLE");
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let provider = Arc::new(MockProvider::new());
    let request = Request::builder()
        .uri("/nope")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app_with(&provider, true), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["message"], "Endpoint '/nope' does not exist");
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let provider = Arc::new(MockProvider::new());
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/analyze/article")
        .header(header::ORIGIN, "chrome-extension://abcdef")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app_with(&provider, true).oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
