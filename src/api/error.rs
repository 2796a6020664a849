use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::fmt;

use super::ApiResponse;
use crate::clients::netra::{UpstreamError, UpstreamReply};
use crate::token::TokenError;

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),

    Unauthorized(String),

    /// Upstream answered with a non-success status; its own status code and
    /// message ride along in the response body.
    UpstreamRejected { status: u16, message: String },

    UpstreamTimeout(String),

    UpstreamUnreachable(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::UpstreamRejected { status, message } => {
                write!(f, "Upstream rejected request ({}): {}", status, message)
            }
            ApiError::UpstreamTimeout(msg) => write!(f, "Upstream timeout: {}", msg),
            ApiError::UpstreamUnreachable(msg) => write!(f, "Upstream unreachable: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::UpstreamRejected { status, message } => {
                tracing::warn!("Upstream rejected request ({}): {}", status, message);
                let body = serde_json::json!({
                    "success": false,
                    "error": message,
                    "status_code": status,
                });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::UpstreamTimeout(msg) => {
                tracing::warn!("Upstream timeout: {}", msg);
                (StatusCode::GATEWAY_TIMEOUT, msg)
            }
            ApiError::UpstreamUnreachable(msg) => {
                tracing::error!("Upstream unreachable: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Timeout(secs) => ApiError::UpstreamTimeout(format!(
                "Upstream did not respond within {secs} seconds"
            )),
            UpstreamError::Transport(msg) => {
                ApiError::UpstreamUnreachable(format!("Network error: {msg}"))
            }
            UpstreamError::MalformedResponse(text) => {
                ApiError::ValidationError(format!("Upstream returned an unexpected response: {text}"))
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    #[must_use]
    pub fn upstream_rejected(reply: &UpstreamReply) -> Self {
        ApiError::UpstreamRejected {
            status: reply.status.as_u16(),
            message: rejection_message(&reply.body),
        }
    }
}

/// Prefer the provider's own message field; fall back to the raw body.
fn rejection_message(body: &Value) -> String {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return message.to_string();
    }

    match body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn upstream_error_conversions() {
        let err: ApiError = UpstreamError::Timeout(15).into();
        assert!(matches!(err, ApiError::UpstreamTimeout(ref msg) if msg.contains("15 seconds")));

        let err: ApiError = UpstreamError::Transport("connection reset".to_string()).into();
        assert!(matches!(err, ApiError::UpstreamUnreachable(_)));

        let err: ApiError = UpstreamError::MalformedResponse("<html>503</html>".to_string()).into();
        assert!(matches!(err, ApiError::ValidationError(ref msg) if msg.contains("<html>503</html>")));
    }

    #[test]
    fn rejection_message_prefers_provider_message_field() {
        let body = serde_json::json!({ "message": "Invalid credentials", "statusCode": 403 });
        assert_eq!(rejection_message(&body), "Invalid credentials");

        let body = Value::String("plain text body".to_string());
        assert_eq!(rejection_message(&body), "plain text body");

        let body = serde_json::json!({ "detail": "no message field" });
        assert_eq!(rejection_message(&body), r#"{"detail":"no message field"}"#);
    }

    #[test]
    fn timeout_maps_to_gateway_timeout() {
        let response = ApiError::UpstreamTimeout("slow upstream".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn rejection_body_carries_upstream_status() {
        let err = ApiError::UpstreamRejected {
            status: 403,
            message: "Invalid credentials".to_string(),
        };

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], serde_json::json!(false));
        assert_eq!(json["error"], serde_json::json!("Invalid credentials"));
        assert_eq!(json["status_code"], serde_json::json!(403));
    }
}
