mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn register_creates_an_account() {
    let app = spawn_app();

    let (status, body) = app.register("alice", "alice@example.com", "secret123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "registration successful");
    assert!(body["userId"].is_string());
}

#[tokio::test]
async fn register_rejects_missing_fields() {
    let app = spawn_app();

    let (status, body) = app
        .post(
            "/api/register",
            None,
            json!({ "username": "alice", "email": "alice@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "all fields are required");

    // Empty strings count as missing
    let (status, _) = app.register("alice", "alice@example.com", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_enforces_field_constraints() {
    let app = spawn_app();

    let (status, body) = app.register("al", "al@example.com", "secret123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "username must be at least 3 characters");

    let (status, body) = app.register("alice", "not-an-email", "secret123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "email address is not valid");

    let (status, body) = app.register("alice", "alice@example.com", "short").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "password must be at least 6 characters");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = spawn_app();

    let (status, _) = app.register("alice", "alice@example.com", "secret123").await;
    assert_eq!(status, StatusCode::OK);

    // Same email under a different username still collides
    let (status, body) = app.register("alicia", "alice@example.com", "secret456").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "email already taken");
}

#[tokio::test]
async fn login_returns_token_and_profile() {
    let app = spawn_app();
    app.register("alice", "alice@example.com", "secret123").await;

    let (status, body) = app
        .post(
            "/api/login",
            None,
            json!({ "email": "alice@example.com", "password": "secret123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = spawn_app();
    app.register("alice", "alice@example.com", "secret123").await;

    let (status, body) = app
        .post(
            "/api/login",
            None,
            json!({ "email": "nobody@example.com", "password": "secret123" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid credentials");

    let (status, body) = app
        .post(
            "/api/login",
            None,
            json!({ "email": "alice@example.com", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid credentials");
}

#[tokio::test]
async fn stored_passwords_are_hashed() {
    let app = spawn_app();
    app.register("alice", "alice@example.com", "secret123").await;

    let accounts = app
        .state
        .users()
        .find(&guitar_club_api::store::Filter::new())
        .await
        .unwrap();
    assert_eq!(accounts.len(), 1);
    let stored = &accounts[0].password_hash;
    assert_ne!(stored, "secret123");
    assert!(stored.starts_with("$argon2"));
}
