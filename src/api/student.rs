use axum::{Json, extract::State, http::HeaderMap};
use serde_json::Value;
use std::sync::Arc;

use super::auth::bearer_token;
use super::{ApiError, ApiPath, ApiResponse, AppState};
use crate::clients::netra::StudentOp;
use crate::token::decode_subject_unverified;

/// Forward one authenticated portal request and wrap the reply. Rejections
/// keep the portal's own status code in the error body.
async fn relay(
    state: &AppState,
    op: StudentOp,
    token: &str,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let reply = state.netra.fetch(op, token).await?;

    if !reply.is_success() {
        return Err(ApiError::upstream_rejected(&reply));
    }

    Ok(Json(ApiResponse::success(reply.body)))
}

/// GET /attendance
/// Day-wise attendance for the student identified by the bearer token.
pub async fn attendance(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let token = bearer_token(&headers)?;
    relay(&state, StudentOp::Attendance, token).await
}

/// GET /subject-attendance
/// Per-subject attendance percentages.
pub async fn subject_attendance(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let token = bearer_token(&headers)?;
    relay(&state, StudentOp::SubjectAttendance, token).await
}

/// GET /timetable
/// Weekly class timetable.
pub async fn timetable(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let token = bearer_token(&headers)?;
    relay(&state, StudentOp::Timetable, token).await
}

/// GET /internal-results
/// Internal exam results. The portal keys this by student id, so the id is
/// read out of the token's subject claim.
pub async fn internal_results(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let token = bearer_token(&headers)?;
    let subject = decode_subject_unverified(token)?;
    relay(&state, StudentOp::InternalResults(subject), token).await
}

/// GET /semester-results
/// End-of-semester results, keyed by the token's subject claim.
pub async fn semester_results(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let token = bearer_token(&headers)?;
    let subject = decode_subject_unverified(token)?;
    relay(&state, StudentOp::SemesterResults(subject), token).await
}

/// GET /notices-count
/// Count of unread notices, keyed by the token's subject claim.
pub async fn notices_count(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let token = bearer_token(&headers)?;
    let subject = decode_subject_unverified(token)?;
    relay(&state, StudentOp::NoticesCount(subject), token).await
}

/// GET /student-profile/{id}
/// Full profile for an explicit student id. Any authenticated caller may look
/// up any id; the portal applies its own access rules.
pub async fn student_profile(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let token = bearer_token(&headers)?;
    relay(&state, StudentOp::Profile(id), token).await
}
