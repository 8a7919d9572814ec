use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::non_empty;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::Comment;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub news_id: Option<String>,
    pub text: Option<String>,
}

/// POST /api/comments - any authenticated user may comment on a news post
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult {
    let (news_id, text) = match (non_empty(payload.news_id), non_empty(payload.text)) {
        (Some(news_id), Some(text)) => (news_id, text),
        _ => return Err(ApiError::validation("all fields are required")),
    };

    let news_id =
        Uuid::parse_str(&news_id).map_err(|_| ApiError::not_found("news item not found"))?;
    if state.news().find_by_id(news_id).await?.is_none() {
        return Err(ApiError::not_found("news item not found"));
    }

    // Tagged with the resolved caller; a userId in the body is ignored
    let comment = Comment::new(news_id, caller.id, text)?;
    state.comments().insert(&comment).await?;

    Ok(ApiResponse::message("comment added").field("commentId", json!(comment.id)))
}
