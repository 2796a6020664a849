use axum::{
    Json,
    extract::{ConnectInfo, Extension, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::warn;

use super::{ApiError, ApiResponse, AppState, SearchData};
use crate::db::SearchType;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// GET /search-students?q=
/// Case-sensitive substring search over the cached student directory. Every
/// successful search leaves one audit row behind.
pub async fn search_students(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
    // The connect-info service stores the peer address as an extension;
    // absent when the router is driven without a real socket.
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let query = params.q.as_deref().unwrap_or_default().trim().to_string();
    if query.is_empty() {
        return Err(ApiError::validation("Search query must not be empty"));
    }

    let outcome = state.store.search_students(&query).await?;

    let search_type = SearchType::classify(&outcome.records, &query);
    let searcher = client_address(&headers, connect_info.as_deref());
    let result_count = i32::try_from(outcome.records.len()).unwrap_or(i32::MAX);

    if let Err(err) = state
        .store
        .record_search(&searcher, &query, search_type, result_count)
        .await
    {
        warn!("Failed to record search audit entry: {err}");
    }

    Ok(Json(ApiResponse::success(SearchData {
        students: outcome.records,
        total_results: outcome.total_matches,
        query,
    })))
}

/// Best available peer address. Proxies put the original client first in
/// `X-Forwarded-For`.
fn client_address(headers: &HeaderMap, connect_info: Option<&ConnectInfo<SocketAddr>>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if let Some(address) = forwarded {
        return address.to_string();
    }

    connect_info.map_or_else(|| "unknown".to_string(), |info| info.0.ip().to_string())
}
