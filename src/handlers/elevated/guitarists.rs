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
use crate::models::Guitarist;

#[derive(Debug, Deserialize)]
pub struct GuitaristPayload {
    pub name: Option<String>,
    pub bio: Option<String>,
}

fn required_fields(payload: GuitaristPayload) -> Result<(String, String), ApiError> {
    match (non_empty(payload.name), non_empty(payload.bio)) {
        (Some(name), Some(bio)) => Ok((name, bio)),
        _ => Err(ApiError::validation("all fields are required")),
    }
}

/// POST /api/guitarists
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<GuitaristPayload>,
) -> ApiResult {
    let (name, bio) = required_fields(payload)?;
    let entry = Guitarist::new(name, bio, Some(caller.id))?;
    state.guitarists().insert(&entry).await?;
    Ok(ApiResponse::message("guitarist added").field("guitaristId", json!(entry.id)))
}

/// PUT /api/guitarists/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GuitaristPayload>,
) -> ApiResult {
    let (name, bio) = required_fields(payload)?;

    let repo = state.guitarists();
    let mut entry = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("guitarist not found"))?;

    entry.edit(name, bio)?;
    if !repo.replace(&entry).await? {
        return Err(ApiError::not_found("guitarist not found"));
    }

    Ok(ApiResponse::message("guitarist updated"))
}

/// DELETE /api/guitarists/:id
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult {
    if !state.guitarists().delete(id).await? {
        return Err(ApiError::not_found("guitarist not found"));
    }
    Ok(ApiResponse::message("guitarist deleted"))
}
