//! Directory cache and search flow tests against a real SQLite file.

use axum::{
    Extension, Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::EntityTrait;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;
use vichaar::api::AppState;
use vichaar::config::Config;
use vichaar::entities::prelude::{SearchLogs, Students};
use vichaar::models::student::StudentSnapshot;

async fn spawn_app() -> (Arc<AppState>, Router) {
    let db_path = std::env::temp_dir().join(format!("vichaar-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = vichaar::api::create_app_state(config)
        .await
        .expect("failed to create app state");
    let router = vichaar::api::router(state.clone());
    (state, router)
}

fn snapshot(id: i64, name: &str, hall_ticket: &str, roll_number: &str) -> StudentSnapshot {
    StudentSnapshot {
        id,
        name: Some(name.to_string()),
        hall_ticket: Some(hall_ticket.to_string()),
        roll_number: Some(roll_number.to_string()),
        branch_name: Some("Computer Science".to_string()),
        section_name: Some("CSE-A".to_string()),
        ..Default::default()
    }
}

/// Runs one search through the router; the query must already be URL-encoded.
async fn search(app: &Router, encoded_query: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/search-students?q={encoded_query}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn store_answers_ping() {
    let (state, _) = spawn_app().await;
    assert!(state.store.ping().await.is_ok());
}

#[tokio::test]
async fn exact_hall_ticket_outranks_other_matches() {
    let (state, app) = spawn_app().await;

    state
        .store
        .upsert_student(&snapshot(1, "Ravi Teja", "23BD1A0501", "501"))
        .await
        .expect("seed student");
    state
        .store
        .upsert_student(&snapshot(2, "Anvi Rao", "23BD1A05013", "5013"))
        .await
        .expect("seed student");

    let (status, json) = search(&app, "23BD1A0501").await;
    assert_eq!(status, StatusCode::OK);

    let students = json["data"]["students"].as_array().expect("students array");
    assert_eq!(students.len(), 2);
    assert_eq!(students[0]["hall_ticket"], serde_json::json!("23BD1A0501"));
    assert_eq!(students[1]["id"], serde_json::json!(2));
    assert_eq!(json["data"]["total_results"], serde_json::json!(2));

    let logs = SearchLogs::find()
        .all(&state.store.conn)
        .await
        .expect("fetch audit rows");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].search_term, "23BD1A0501");
    assert_eq!(logs[0].search_type, "hall_ticket");
    assert_eq!(logs[0].result_count, 2);
    // No peer info is available through oneshot.
    assert_eq!(logs[0].searcher_address, "unknown");
}

#[tokio::test]
async fn name_matches_sort_alphabetically_and_stay_case_sensitive() {
    let (state, app) = spawn_app().await;

    state
        .store
        .upsert_student(&snapshot(10, "Sneha Reddy", "23BD1A0510", "510"))
        .await
        .expect("seed student");
    state
        .store
        .upsert_student(&snapshot(11, "Sneha Agarwal", "23BD1A0511", "511"))
        .await
        .expect("seed student");
    // Matches SQLite's case-insensitive LIKE but not the literal query.
    state
        .store
        .upsert_student(&snapshot(12, "SNEHA KAPOOR", "23BD1A0512", "512"))
        .await
        .expect("seed student");

    let (status, json) = search(&app, "Sneha").await;
    assert_eq!(status, StatusCode::OK);

    let students = json["data"]["students"].as_array().expect("students array");
    assert_eq!(students.len(), 2);
    assert_eq!(students[0]["name"], serde_json::json!("Sneha Agarwal"));
    assert_eq!(students[1]["name"], serde_json::json!("Sneha Reddy"));
    assert_eq!(json["data"]["total_results"], serde_json::json!(2));

    let logs = SearchLogs::find()
        .all(&state.store.conn)
        .await
        .expect("fetch audit rows");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].search_type, "name");
}

#[tokio::test]
async fn results_cap_at_twenty_with_full_count_reported() {
    let (state, app) = spawn_app().await;

    for i in 1..=25_i64 {
        state
            .store
            .upsert_student(&snapshot(
                100 + i,
                &format!("Batch Student {i:02}"),
                &format!("23BD1A03{i:02}"),
                &format!("3{i:02}"),
            ))
            .await
            .expect("seed student");
    }

    let (status, json) = search(&app, "Batch%20Student").await;
    assert_eq!(status, StatusCode::OK);

    let students = json["data"]["students"].as_array().expect("students array");
    assert_eq!(students.len(), 20);
    assert_eq!(students[0]["name"], serde_json::json!("Batch Student 01"));
    assert_eq!(students[19]["name"], serde_json::json!("Batch Student 20"));
    assert_eq!(json["data"]["total_results"], serde_json::json!(25));
    assert_eq!(json["data"]["query"], serde_json::json!("Batch Student"));

    let logs = SearchLogs::find()
        .all(&state.store.conn)
        .await
        .expect("fetch audit rows");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].result_count, 20);
}

#[tokio::test]
async fn rejected_search_leaves_no_audit_row() {
    let (state, app) = spawn_app().await;

    state
        .store
        .upsert_student(&snapshot(1, "Ravi Teja", "23BD1A0501", "501"))
        .await
        .expect("seed student");

    let (status, json) = search(&app, "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], serde_json::json!(false));

    let logs = SearchLogs::find()
        .all(&state.store.conn)
        .await
        .expect("fetch audit rows");
    assert!(logs.is_empty());
}

#[tokio::test]
async fn forwarded_header_sets_searcher_address() {
    let (state, app) = spawn_app().await;

    state
        .store
        .upsert_student(&snapshot(1, "Ravi Teja", "23BD1A0501", "501"))
        .await
        .expect("seed student");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/search-students?q=Ravi")
                .header("X-Forwarded-For", "10.1.2.3, 172.16.0.1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let logs = SearchLogs::find()
        .all(&state.store.conn)
        .await
        .expect("fetch audit rows");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].searcher_address, "10.1.2.3");
}

#[tokio::test]
async fn socket_peer_backfills_searcher_address() {
    let (state, app) = spawn_app().await;

    state
        .store
        .upsert_student(&snapshot(1, "Ravi Teja", "23BD1A0501", "501"))
        .await
        .expect("seed student");

    // Same wiring as a real serve: the peer address rides in as an extension.
    let app = app.layer(Extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 9123)))));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/search-students?q=Ravi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let logs = SearchLogs::find()
        .all(&state.store.conn)
        .await
        .expect("fetch audit rows");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].searcher_address, "127.0.0.1");
}

#[tokio::test]
async fn upsert_replaces_snapshot_and_preserves_created_at() {
    let (state, _) = spawn_app().await;

    state
        .store
        .upsert_student(&snapshot(77, "Before Update", "23BD1A0577", "577"))
        .await
        .expect("first upsert");

    let first = state
        .store
        .get_student(77)
        .await
        .expect("fetch student")
        .expect("student should exist");

    state
        .store
        .upsert_student(&snapshot(77, "After Update", "23BD1A0578", "578"))
        .await
        .expect("second upsert");

    let second = state
        .store
        .get_student(77)
        .await
        .expect("fetch student")
        .expect("student should exist");

    assert_eq!(second.name.as_deref(), Some("After Update"));
    assert_eq!(second.hall_ticket.as_deref(), Some("23BD1A0578"));
    assert_eq!(second.created_at, first.created_at);
    assert!(chrono::DateTime::parse_from_rfc3339(&second.last_updated).is_ok());
    // RFC 3339 UTC strings order lexicographically.
    assert!(second.last_updated >= first.last_updated);

    let all = Students::find()
        .all(&state.store.conn)
        .await
        .expect("fetch students");
    assert_eq!(all.len(), 1);
}
