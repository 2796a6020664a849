use axum::{Json, extract::State, http::HeaderMap};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::clients::netra::LoginPayload;
use crate::models::student::StudentSnapshot;
use crate::token::decode_subject_unverified;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub hall_ticket: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub captcha_token: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login
/// Forward credentials to the college portal and relay its response verbatim.
/// On success the embedded student record is cached in the local directory.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let username = [payload.hall_ticket, payload.phone_number]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| ApiError::validation("Hall ticket or phone number is required"))?;

    let password = payload
        .password
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::validation("Password is required"))?;

    let reply = state
        .netra
        .login(&LoginPayload::new(username, password, payload.captcha_token))
        .await?;

    if !reply.is_success() {
        return Err(ApiError::upstream_rejected(&reply));
    }

    cache_student_snapshot(&state, &reply.body).await;

    Ok(Json(ApiResponse::success_with_message(
        "Login successful",
        reply.body,
    )))
}

// ============================================================================
// Helpers
// ============================================================================

/// Pull the bearer token out of the `Authorization` header. Every relay
/// endpoint funnels through this before touching the portal.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("No authorization token"))
}

/// Best-effort refresh of the local directory from the login payload. Failures
/// are logged and swallowed; the caller's login already succeeded.
async fn cache_student_snapshot(state: &AppState, body: &Value) {
    let Some(token) = body.get("access_token").and_then(Value::as_str) else {
        warn!("Login response carried no access_token; skipping directory update");
        return;
    };

    let subject_id = match decode_subject_unverified(token) {
        Ok(id) => id,
        Err(err) => {
            warn!("Could not read subject id from login token: {err}");
            return;
        }
    };

    let snapshot = StudentSnapshot::from_login_body(body, subject_id);
    if let Err(err) = state.store.upsert_student(&snapshot).await {
        warn!("Failed to update student directory for {subject_id}: {err}");
    }
}
