//! Router-level integration tests.
//!
//! These run against a lazily-connected pool: every request below is
//! rejected by the auth or validation layers before any query executes,
//! so no live database is required.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use webster_server::{app, auth, AppState, Config};

fn test_state(public_dir: std::path::PathBuf) -> AppState {
    let config = Config {
        database_url: "postgres://localhost:1/webster_offline".to_string(),
        port: 0,
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expiry_hours: 1,
        public_dir,
        max_upload_bytes: 1024 * 1024,
        allowed_origins: vec!["http://localhost:5173".to_string()],
    };
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    AppState::new(pool, Arc::new(config))
}

fn bearer(state: &AppState) -> String {
    let token = auth::issue_token(&state.config, Uuid::new_v4(), "tester@example.com")
        .expect("issue token");
    format!("Bearer {token}")
}

#[tokio::test]
async fn test_liveness_needs_no_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path().to_path_buf());

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/health/live")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path().to_path_buf());

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/canvas")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path().to_path_buf());

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/marcas")
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_canvas_content_is_rejected_before_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path().to_path_buf());
    let token = bearer(&state);

    let payload = serde_json::json!({
        "name": "Broken",
        "description": "",
        "content": "this is not a stage object array",
    });

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/canvas")
                .header(header::AUTHORIZATION, &token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_out_of_range_dimensions_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path().to_path_buf());
    let token = bearer(&state);

    let payload = serde_json::json!({
        "name": "Too big",
        "description": "",
        "content": "[]",
        "width": 20000,
    });

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/canvas")
                .header(header::AUTHORIZATION, &token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_non_image_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path().to_path_buf());
    let token = bearer(&state);

    let boundary = "webster-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"payload.exe\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         MZ\r\n\
         --{boundary}--\r\n"
    );

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload/background")
                .header(header::AUTHORIZATION, &token)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was written under the public dir.
    assert!(!dir.path().join("uploads").exists());
}

#[tokio::test]
async fn test_background_delete_validates_filename() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path().to_path_buf());
    let token = bearer(&state);

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/upload/background/evil.exe")
                .header(header::AUTHORIZATION, &token)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
