//! Public read endpoints: content lists with resolved author names,
//! always ordered newest-first.

use std::collections::HashMap;

use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Guitarist, History, News};
use crate::store::{Filter, StoreError};

/// Display reference to a user: id and username, nothing else
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserRef {
    id: Uuid,
    username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticleView {
    id: Uuid,
    title: String,
    content: String,
    author: Option<UserRef>,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GuitaristView {
    id: Uuid,
    name: String,
    bio: String,
    author: Option<UserRef>,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentView {
    id: Uuid,
    news_id: Uuid,
    user: Option<UserRef>,
    text: String,
    created_at: DateTime<Utc>,
}

async fn username_index(state: &AppState) -> Result<HashMap<Uuid, String>, StoreError> {
    let users = state.users().find(&Filter::new()).await?;
    Ok(users.into_iter().map(|u| (u.id, u.username)).collect())
}

fn user_ref(index: &HashMap<Uuid, String>, id: Option<Uuid>) -> Option<UserRef> {
    let id = id?;
    index.get(&id).map(|username| UserRef {
        id,
        username: username.clone(),
    })
}

/// GET /api/news
pub async fn news_list(State(state): State<AppState>) -> ApiResult {
    let names = username_index(&state).await?;
    let items = state
        .news()
        .find(&Filter::new().order_desc("createdAt"))
        .await?;

    let views: Vec<ArticleView> = items
        .into_iter()
        .map(|item: News| ArticleView {
            id: item.id,
            title: item.title,
            content: item.content,
            author: user_ref(&names, item.author),
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
        .collect();

    Ok(ApiResponse::success().field("news", json!(views)))
}

/// GET /api/history
pub async fn history_list(State(state): State<AppState>) -> ApiResult {
    let names = username_index(&state).await?;
    let items = state
        .history()
        .find(&Filter::new().order_desc("createdAt"))
        .await?;

    let views: Vec<ArticleView> = items
        .into_iter()
        .map(|item: History| ArticleView {
            id: item.id,
            title: item.title,
            content: item.content,
            author: user_ref(&names, item.author),
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
        .collect();

    Ok(ApiResponse::success().field("history", json!(views)))
}

/// GET /api/guitarists
pub async fn guitarist_list(State(state): State<AppState>) -> ApiResult {
    let names = username_index(&state).await?;
    let items = state
        .guitarists()
        .find(&Filter::new().order_desc("createdAt"))
        .await?;

    let views: Vec<GuitaristView> = items
        .into_iter()
        .map(|item: Guitarist| GuitaristView {
            id: item.id,
            name: item.name,
            bio: item.bio,
            author: user_ref(&names, item.author),
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
        .collect();

    Ok(ApiResponse::success().field("guitarists", json!(views)))
}

/// GET /api/comments/:id - comments under one news post
pub async fn comment_list(State(state): State<AppState>, Path(news_id): Path<Uuid>) -> ApiResult {
    let names = username_index(&state).await?;
    let comments = state
        .comments()
        .find(
            &Filter::new()
                .where_eq("newsId", news_id)
                .order_desc("createdAt"),
        )
        .await?;

    let views: Vec<CommentView> = comments
        .into_iter()
        .map(|comment| CommentView {
            id: comment.id,
            news_id: comment.news_id,
            user: user_ref(&names, Some(comment.user_id)),
            text: comment.text,
            created_at: comment.created_at,
        })
        .collect();

    Ok(ApiResponse::success().field("comments", json!(views)))
}
