use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::non_empty;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::History;

#[derive(Debug, Deserialize)]
pub struct HistoryPayload {
    pub title: Option<String>,
    pub content: Option<String>,
}

fn required_fields(payload: HistoryPayload) -> Result<(String, String), ApiError> {
    match (non_empty(payload.title), non_empty(payload.content)) {
        (Some(title), Some(content)) => Ok((title, content)),
        _ => Err(ApiError::validation("all fields are required")),
    }
}

/// POST /api/history
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<HistoryPayload>,
) -> ApiResult {
    let (title, content) = required_fields(payload)?;
    let entry = History::new(title, content, Some(caller.id))?;
    state.history().insert(&entry).await?;
    Ok(ApiResponse::message("history entry created").field("historyId", json!(entry.id)))
}

/// PUT /api/history/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<HistoryPayload>,
) -> ApiResult {
    let (title, content) = required_fields(payload)?;

    let repo = state.history();
    let mut entry = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("history entry not found"))?;

    entry.edit(title, content)?;
    if !repo.replace(&entry).await? {
        return Err(ApiError::not_found("history entry not found"));
    }

    Ok(ApiResponse::message("history entry updated"))
}

/// DELETE /api/history/:id - no cascade, history has no dependents
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult {
    if !state.history().delete(id).await? {
        return Err(ApiError::not_found("history entry not found"));
    }
    Ok(ApiResponse::message("history entry deleted"))
}
