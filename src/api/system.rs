use axum::Json;
use chrono::Utc;

use super::{ApiResponse, HealthResponse, ServiceInfo};

/// GET /
/// Service banner with the running version.
pub async fn index() -> Json<ApiResponse<ServiceInfo>> {
    Json(ApiResponse::success(ServiceInfo {
        service: "vichaar",
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// GET /health
/// Liveness probe; answers as long as the process is serving requests.
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse { status: "alive" }))
}
