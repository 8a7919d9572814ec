use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::json;

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::non_empty;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{user, User};
use crate::services::password;
use crate::store::Filter;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/register - create a user account with the default role
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult {
    let (username, email, raw_password) = match (
        non_empty(payload.username),
        non_empty(payload.email),
        non_empty(payload.password),
    ) {
        (Some(username), Some(email), Some(password)) => (username, email, password),
        _ => return Err(ApiError::validation("all fields are required")),
    };

    user::validate_password(&raw_password)?;

    // Friendly pre-check; the store's unique constraint on email still
    // backstops concurrent registrations.
    let users = state.users();
    if users
        .find_one(&Filter::new().where_eq("email", &email))
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("email already taken"));
    }

    let password_hash = password::hash(raw_password).await?;
    let account = User::new(username, email, password_hash)?;
    users.insert(&account).await?;

    Ok(ApiResponse::message("registration successful").field("userId", json!(account.id)))
}
