use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Role, UserView};
use crate::store::Filter;

/// GET /api/users - password hashes are never included
pub async fn list(State(state): State<AppState>) -> ApiResult {
    let users = state
        .users()
        .find(&Filter::new().order_desc("createdAt"))
        .await?;
    let views: Vec<UserView> = users.into_iter().map(UserView::from).collect();
    Ok(ApiResponse::success().field("users", json!(views)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Option<String>,
}

/// PUT /api/users/:id - change a user's role
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult {
    let role: Role = payload.role.as_deref().unwrap_or("").parse()?;

    let users = state.users();
    let mut account = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    account.role = role;
    if !users.replace(&account).await? {
        return Err(ApiError::not_found("user not found"));
    }

    Ok(ApiResponse::message("role updated"))
}

/// DELETE /api/users/:id
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult {
    if !state.users().delete(id).await? {
        return Err(ApiError::not_found("user not found"));
    }
    Ok(ApiResponse::message("user deleted"))
}
