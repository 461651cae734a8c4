// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;
use vidtube::config::Config;
use vidtube::db::FirestoreDb;
use vidtube::routes::create_router;
use vidtube::services::{MediaService, SessionService, TokenService};
use vidtube::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Build app state around a given database connection.
#[allow(dead_code)]
fn build_state(db: FirestoreDb) -> Arc<AppState> {
    let config = Config::test_default();
    let tokens = TokenService::from_config(&config);
    let session = SessionService::new(db.clone(), tokens.clone());
    let media = MediaService::new(&config);

    Arc::new(AppState {
        config,
        db,
        tokens,
        session,
        media,
    })
}

/// Create a test app with an offline mock database.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let state = build_state(FirestoreDb::new_mock());
    (create_router(state.clone()), state)
}

/// Create a test app against the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (Router, Arc<AppState>) {
    let db = FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator");
    let state = build_state(db);
    (create_router(state.clone()), state)
}

/// Register a user through the API; returns the created profile data.
#[allow(dead_code)]
pub async fn register_user(
    app: &Router,
    username: &str,
    email: &str,
    password: &str,
) -> serde_json::Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(serde_json::json!({
            "fullName": format!("Test {username}"),
            "email": email,
            "username": username,
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    body["data"].clone()
}

/// Log in through the API; returns the session data (user + tokens).
#[allow(dead_code)]
pub async fn login_user(app: &Router, username: &str, password: &str) -> serde_json::Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(serde_json::json!({
            "username": username,
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"].clone()
}

/// Send a JSON request and return (status, parsed body).
#[allow(dead_code)]
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, value)
}
