use axum::extract::{Path, State};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// DELETE /api/comments/:id - moderation, admin only
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult {
    if !state.comments().delete(id).await? {
        return Err(ApiError::not_found("comment not found"));
    }
    Ok(ApiResponse::message("comment deleted"))
}
