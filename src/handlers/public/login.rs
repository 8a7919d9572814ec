use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::json;

use crate::app::AppState;
use crate::auth;
use crate::error::ApiError;
use crate::handlers::non_empty;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::password;
use crate::store::Filter;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/login - verify credentials and issue a bearer token
pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> ApiResult {
    let (email, raw_password) = match (non_empty(payload.email), non_empty(payload.password)) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(ApiError::validation("all fields are required")),
    };

    let users = state.users();
    let found = users
        .find_one(&Filter::new().where_eq("email", &email))
        .await?;

    // Unknown email and wrong password produce the same generic failure
    let Some(mut account) = found else {
        return Err(ApiError::unauthorized("invalid credentials"));
    };
    if !password::verify(raw_password, account.password_hash.clone()).await? {
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    account.record_login();
    users.replace(&account).await?;

    let token = auth::generate_token(account.id, &state.config.security)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(ApiResponse::success().field("token", json!(token)).field(
        "user",
        json!({
            "id": account.id,
            "role": account.role,
            "username": account.username,
        }),
    ))
}
