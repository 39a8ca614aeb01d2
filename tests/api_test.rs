//! Integration tests for API endpoints.
//!
//! The full router runs against an in-memory SQLite database with
//! migrations applied; requests are driven with `oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use habit_tracker::api::{create_router, AppState};
use habit_tracker::config::{Config, API_KEY_HEADER};
use habit_tracker::infra::Database;

const BOT_KEY: &str = "test-bot-key";

// =============================================================================
// Test Helpers
// =============================================================================

async fn test_app() -> Router {
    let config = Config::for_database("sqlite::memory:");
    let db = Database::connect(&config).await.expect("in-memory database");
    create_router(AppState::from_config(Arc::new(db), config))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn request_token(app: &Router, key: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/auth/token")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = key {
        builder = builder.header(API_KEY_HEADER, key);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn login(app: &Router, telegram_id: i64) -> String {
    let (status, body) = request_token(
        app,
        Some(BOT_KEY),
        json!({ "telegram_id": telegram_id, "username": format!("user{}", telegram_id) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_habit(app: &Router, token: &str, name: &str, remind_at: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/habits",
        Some(token),
        Some(json!({ "name": name, "time_to_remind": remind_at })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

// =============================================================================
// Public Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Habit Tracker");

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/habits/{id}/executions"].is_object());
}

// =============================================================================
// Authentication Tests
// =============================================================================

#[tokio::test]
async fn test_token_requires_bot_key() {
    let app = test_app().await;
    let profile = json!({ "telegram_id": 1 });

    let (status, body) = request_token(&app, None, profile.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = request_token(&app, Some("wrong"), profile).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_is_idempotent_per_telegram_user() {
    let app = test_app().await;

    let (status, first) = request_token(
        &app,
        Some(BOT_KEY),
        json!({ "telegram_id": 77, "first_name": "Ann" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["token_type"], "Bearer");
    assert_eq!(first["expires_in"], 1800);

    let (_, second) = request_token(
        &app,
        Some(BOT_KEY),
        json!({ "telegram_id": 77, "first_name": "Anna" }),
    )
    .await;
    assert_eq!(second["user"]["id"], first["user"]["id"]);
    assert_eq!(second["user"]["first_name"], "Anna");
}

#[tokio::test]
async fn test_token_rejects_invalid_profile() {
    let app = test_app().await;
    let (status, body) = request_token(&app, Some(BOT_KEY), json!({ "telegram_id": 0 })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_protected_routes_require_jwt() {
    let app = test_app().await;

    let (status, _) = send(&app, Method::GET, "/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/habits", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// User Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_current_user_profile() {
    let app = test_app().await;
    let token = login(&app, 5).await;

    let (status, body) = send(&app, Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["telegram_id"], 5);
    assert_eq!(body["username"], "user5");

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/users/me",
        Some(&token),
        Some(json!({ "is_bot_blocked": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_bot_blocked"], true);
    assert_eq!(body["username"], "user5");
}

// =============================================================================
// Habit Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_habit_lifecycle() {
    let app = test_app().await;
    let token = login(&app, 1).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/habits",
        Some(&token),
        Some(json!({ "name": "Read", "description": "10 pages", "time_to_remind": "21:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["target_days"], 21);
    assert_eq!(body["data"]["frequency"], "daily");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/habits/{}", id),
        Some(&token),
        Some(json!({ "description": null, "target_days": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Read");
    assert_eq!(body["target_days"], 30);
    assert!(body["description"].is_null());

    let (status, body) = send(&app, Method::GET, &format!("/habits/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["habit"]["id"], id);
    assert_eq!(body["executions"], json!([]));

    let (status, _) = send(&app, Method::DELETE, &format!("/habits/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/habits/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_habit_validation() {
    let app = test_app().await;
    let token = login(&app, 1).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/habits",
        Some(&token),
        Some(json!({ "name": "", "time_to_remind": "21:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        "/habits",
        Some(&token),
        Some(json!({ "name": "Read", "time_to_remind": "late" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_habit_listing_and_pagination() {
    let app = test_app().await;
    let token = login(&app, 1).await;

    create_habit(&app, &token, "Stretch", "22:00").await;
    create_habit(&app, &token, "Run", "06:30").await;
    let paused = create_habit(&app, &token, "Meditate", "07:00").await;
    send(
        &app,
        Method::PATCH,
        &format!("/habits/{}", paused),
        Some(&token),
        Some(json!({ "is_active": false })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/habits?per_page=2", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["total_pages"], 2);

    let (_, body) = send(&app, Method::GET, "/habits?active_only=true", Some(&token), None).await;
    let names: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Run", "Stretch"]);
    assert_eq!(body["meta"]["total"], 2);
}

#[tokio::test]
async fn test_foreign_habit_is_hidden() {
    let app = test_app().await;
    let owner = login(&app, 1).await;
    let intruder = login(&app, 2).await;
    let id = create_habit(&app, &owner, "Read", "21:00").await;

    let (status, _) = send(&app, Method::GET, &format!("/habits/{}", id), Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/habits/{}", id),
        Some(&intruder),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/habits/{}/executions", id),
        Some(&intruder),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/habits", Some(&intruder), None).await;
    assert_eq!(body["meta"]["total"], 0);
}

// =============================================================================
// Execution Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_recording_today_updates_streak() {
    let app = test_app().await;
    let token = login(&app, 1).await;
    let id = create_habit(&app, &token, "Read", "21:00").await;
    let executions = format!("/habits/{}/executions", id);

    let (status, body) = send(
        &app,
        Method::POST,
        &executions,
        Some(&token),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "done");
    let execution_id = body["data"]["id"].clone();

    let (_, habit) = send(&app, Method::GET, &format!("/habits/{}", id), Some(&token), None).await;
    assert_eq!(habit["habit"]["current_streak"], 1);
    assert_eq!(habit["habit"]["max_streak"], 1);
    assert_eq!(habit["executions"].as_array().unwrap().len(), 1);

    // same day again replaces the record
    let (status, body) = send(
        &app,
        Method::POST,
        &executions,
        Some(&token),
        Some(json!({ "status": "not_done" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], execution_id);

    let (_, habit) = send(&app, Method::GET, &format!("/habits/{}", id), Some(&token), None).await;
    assert_eq!(habit["habit"]["current_streak"], 0);
    assert_eq!(habit["habit"]["max_streak"], 1);
    assert_eq!(habit["executions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_and_list_executions() {
    let app = test_app().await;
    let token = login(&app, 1).await;
    let id = create_habit(&app, &token, "Read", "21:00").await;
    let executions = format!("/habits/{}/executions", id);

    let (_, body) = send(
        &app,
        Method::POST,
        &executions,
        Some(&token),
        Some(json!({ "status": "pending" })),
    )
    .await;
    let execution_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("{}/{}", executions, execution_id),
        Some(&token),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "done");

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("{}?status=done", executions),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("{}?status=skipped", executions),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["meta"]["total"], 0);

    let (status, body) = send(&app, Method::GET, &format!("{}/recent", executions), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("{}/{}", executions, execution_id + 100),
        Some(&token),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_execution_query_validation() {
    let app = test_app().await;
    let token = login(&app, 1).await;
    let id = create_habit(&app, &token, "Read", "21:00").await;

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/habits/{}/executions/recent?n=0", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!(
            "/habits/{}/executions?start_date=2024-05-10&end_date=2024-05-01",
            id
        ),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/habits/{}/executions", id),
        Some(&token),
        Some(json!({ "status": "maybe" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_huge_page_returns_empty_page() {
    let app = test_app().await;
    let token = login(&app, 1).await;
    let id = create_habit(&app, &token, "Read", "21:00").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/habits?page=18446744073709551615",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["total"], 1);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/habits/{}/executions?page=18446744073709551615&per_page=100", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_query_and_path_use_error_envelope() {
    let app = test_app().await;
    let token = login(&app, 1).await;
    let id = create_habit(&app, &token, "Read", "21:00").await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/habits/{}/executions?status=bogus", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, body) = send(&app, Method::GET, "/habits?page=-1", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, body) = send(&app, Method::GET, "/habits/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_simultaneous_recordings_share_one_row() {
    let app = test_app().await;
    let token = login(&app, 1).await;
    let id = create_habit(&app, &token, "Read", "21:00").await;
    let executions = format!("/habits/{}/executions", id);

    let (first, second) = tokio::join!(
        send(
            &app,
            Method::POST,
            &executions,
            Some(&token),
            Some(json!({ "status": "done" })),
        ),
        send(
            &app,
            Method::POST,
            &executions,
            Some(&token),
            Some(json!({ "status": "skipped" })),
        ),
    );
    assert_eq!(first.0, StatusCode::CREATED);
    assert_eq!(second.0, StatusCode::CREATED);
    assert_eq!(first.1["data"]["id"], second.1["data"]["id"]);

    let (_, body) = send(&app, Method::GET, &executions, Some(&token), None).await;
    assert_eq!(body["meta"]["total"], 1);
}
