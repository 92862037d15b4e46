//! HTTP response types
//!
//! Failures are reported as `{ timestamp, status, error, message, path }`.

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error result for API error responses
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResult {
    pub timestamp: String,
    pub status: i32,
    pub error: String,
    pub message: String,
    pub path: String,
}

impl ErrorResult {
    pub fn new(status: StatusCode, message: &str, path: &str) -> Self {
        ErrorResult {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: status.as_u16() as i32,
            error: status.canonical_reason().unwrap_or_default().to_string(),
            message: message.to_string(),
            path: path.to_string(),
        }
    }

    pub fn http_response(status: StatusCode, message: &str, path: &str) -> HttpResponse {
        HttpResponseBuilder::new(status).json(ErrorResult::new(status, message, path))
    }

    pub fn http_response_unauthorized(message: &str, path: &str) -> HttpResponse {
        Self::http_response(StatusCode::UNAUTHORIZED, message, path)
    }

    pub fn http_response_forbidden(message: &str, path: &str) -> HttpResponse {
        Self::http_response(StatusCode::FORBIDDEN, message, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result_fields() {
        let result = ErrorResult::new(StatusCode::FORBIDDEN, "authorization failed!", "/api/v1/x");

        assert_eq!(result.status, 403);
        assert_eq!(result.error, "Forbidden");
        assert_eq!(result.message, "authorization failed!");
        assert_eq!(result.path, "/api/v1/x");
        assert!(chrono::DateTime::parse_from_rfc3339(&result.timestamp).is_ok());
    }

    #[test]
    fn test_http_response_status() {
        let response = ErrorResult::http_response_unauthorized("no token provided", "/");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ErrorResult::http_response(StatusCode::BAD_REQUEST, "bad", "/");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
