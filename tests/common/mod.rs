//! Shared test harness: an in-process router over the in-memory store.
//!
//! Requests are dispatched with `tower::ServiceExt::oneshot`, so the suite
//! needs no listening socket and no database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use guitar_club_api::app::{router, AppState};
use guitar_club_api::config::AppConfig;
use guitar_club_api::models::{self, Role, User};
use guitar_club_api::services::password;
use guitar_club_api::store::MemoryStore;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn spawn_app() -> TestApp {
    let collections = models::collections();
    let store = Arc::new(MemoryStore::new(&collections));
    let state = AppState::new(store, AppConfig::development());
    TestApp {
        router: router(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        // Rejections produced by extractors carry plain-text bodies
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, token, None).await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        raw_password: &str,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/register",
            None,
            json!({ "username": username, "email": email, "password": raw_password }),
        )
        .await
    }

    /// Log in and return the bearer token, asserting success.
    pub async fn login(&self, email: &str, raw_password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/login",
                None,
                json!({ "email": email, "password": raw_password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token in login body").to_string()
    }

    /// Register a regular account and return its token.
    pub async fn member_token(&self, username: &str, email: &str) -> String {
        let (status, body) = self.register(username, email, "hunter2!").await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        self.login(email, "hunter2!").await
    }

    /// Seed an admin account directly in the store and return its token.
    /// Role changes normally require an existing admin, so tests start here.
    pub async fn admin_token(&self) -> String {
        let hash = password::hash("adminpass".into()).await.unwrap();
        let mut admin = User::new("admin".into(), "admin@club.example".into(), hash).unwrap();
        admin.role = Role::Admin;
        self.state.users().insert(&admin).await.unwrap();
        self.login("admin@club.example", "adminpass").await
    }
}
