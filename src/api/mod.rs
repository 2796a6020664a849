use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::netra::NetraClient;
use crate::config::Config;
use crate::db::Store;

pub mod auth;
mod error;
mod extract;
mod search;
mod student;
mod system;
mod types;

pub use error::ApiError;
pub use extract::{ApiJson, ApiPath};
pub use types::*;

/// Shared context handed to every handler. Everything here is cheap to share:
/// the store wraps a connection pool and the client wraps a reqwest pool.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub netra: NetraClient,
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let netra = NetraClient::new(&config.upstream)?;

    Ok(Arc::new(AppState {
        config,
        store,
        netra,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = &state.config.server.cors_allowed_origins;

    let cors_layer = if cors_origins.is_empty() || cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/", get(system::index))
        .route("/health", get(system::health))
        .route("/login", post(auth::login))
        .route("/attendance", get(student::attendance))
        .route("/subject-attendance", get(student::subject_attendance))
        .route("/timetable", get(student::timetable))
        .route("/internal-results", get(student::internal_results))
        .route("/semester-results", get(student::semester_results))
        .route("/notices-count", get(student::notices_count))
        .route("/student-profile/{id}", get(student::student_profile))
        .route("/search-students", get(search::search_students))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
