//! JSON response envelope and error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use credibility::{ErrorKind, ErrorRecord};
use serde::Serialize;

/// `{success, data?, error?}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(error: impl Serialize) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(serde_json::to_value(error).unwrap_or(serde_json::Value::Null)),
        }
    }
}

/// Errors a route can return.
#[derive(Debug)]
pub enum ApiError {
    /// Body did not deserialize
    InvalidBody,
    /// Pipeline failure
    Analysis(ErrorRecord),
}

impl From<ErrorRecord> for ApiError {
    fn from(record: ErrorRecord) -> Self {
        ApiError::Analysis(record)
    }
}

/// HTTP status for a pipeline failure.
pub fn status_for(record: &ErrorRecord) -> StatusCode {
    match record.kind {
        ErrorKind::InvalidContent if !record.retryable => StatusCode::BAD_REQUEST,
        ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::ApiUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidBody => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure("Invalid request body")),
            )
                .into_response(),
            ApiError::Analysis(record) => {
                let status = status_for(&record);
                tracing::warn!(
                    status = status.as_u16(),
                    kind = %record.kind,
                    attempt = record.attempt,
                    error = %record.message,
                    failure = ?record.failure,
                    "Analysis request failed"
                );
                (status, Json(ApiResponse::failure(&record))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credibility::Failure;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Failure::EmptyContent, StatusCode::BAD_REQUEST),
            (Failure::HttpStatus { status: 400 }, StatusCode::BAD_REQUEST),
            (Failure::HttpStatus { status: 429 }, StatusCode::TOO_MANY_REQUESTS),
            (Failure::HttpStatus { status: 503 }, StatusCode::SERVICE_UNAVAILABLE),
            (
                Failure::MissingCredential { provider: "gemini" },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (Failure::Degenerate, StatusCode::BAD_GATEWAY),
            (Failure::Timeout, StatusCode::BAD_GATEWAY),
            (Failure::Cancelled, StatusCode::BAD_GATEWAY),
        ];
        for (failure, expected) in cases {
            let record = ErrorRecord::from(failure.clone());
            assert_eq!(status_for(&record), expected, "{failure:?}");
        }
    }

    #[test]
    fn test_envelope_omits_empty_fields() {
        let value = serde_json::to_value(ApiResponse::ok(42)).unwrap();
        assert_eq!(value, serde_json::json!({"success": true, "data": 42}));

        let value = serde_json::to_value(ApiResponse::failure("nope")).unwrap();
        assert_eq!(value, serde_json::json!({"success": false, "error": "nope"}));
    }
}
