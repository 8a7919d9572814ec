use std::time::Duration;

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
use crate::models::News;
use crate::store::Filter;

const CASCADE_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
pub struct NewsPayload {
    pub title: Option<String>,
    pub content: Option<String>,
}

fn required_fields(payload: NewsPayload) -> Result<(String, String), ApiError> {
    match (non_empty(payload.title), non_empty(payload.content)) {
        (Some(title), Some(content)) => Ok((title, content)),
        _ => Err(ApiError::validation("all fields are required")),
    }
}

/// POST /api/news
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<NewsPayload>,
) -> ApiResult {
    let (title, content) = required_fields(payload)?;
    let item = News::new(title, content, Some(caller.id))?;
    state.news().insert(&item).await?;
    Ok(ApiResponse::message("news created").field("newsId", json!(item.id)))
}

/// PUT /api/news/:id - never an upsert
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewsPayload>,
) -> ApiResult {
    let (title, content) = required_fields(payload)?;

    let repo = state.news();
    let mut item = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("news item not found"))?;

    item.edit(title, content)?;
    if !repo.replace(&item).await? {
        return Err(ApiError::not_found("news item not found"));
    }

    Ok(ApiResponse::message("news updated"))
}

/// DELETE /api/news/:id - cascades deletion of the comment thread
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult {
    if !state.news().delete(id).await? {
        return Err(ApiError::not_found("news item not found"));
    }

    // The news deletion has committed; the comment sweep is a follow-up.
    // On failure the startup orphan sweep eventually reconciles.
    let filter = Filter::new().where_eq("newsId", id);
    if let Err(e) = state.comments().delete_many(&filter).await {
        tracing::warn!(
            "comment cascade for news {} failed, scheduling retry: {}",
            id,
            e
        );
        let comments = state.comments();
        tokio::spawn(async move {
            tokio::time::sleep(CASCADE_RETRY_DELAY).await;
            if let Err(e) = comments.delete_many(&filter).await {
                tracing::error!("comment cascade retry for news {} failed: {}", id, e);
            }
        });
    }

    Ok(ApiResponse::message("news and its comments deleted"))
}
