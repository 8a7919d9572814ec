//! Application state and router assembly.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{require_admin, require_auth};
use crate::models::{Comment, Guitarist, History, News, User};
use crate::store::{DocumentStore, Repository};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn users(&self) -> Repository<User> {
        Repository::new(self.store.clone())
    }

    pub fn news(&self) -> Repository<News> {
        Repository::new(self.store.clone())
    }

    pub fn history(&self) -> Repository<History> {
        Repository::new(self.store.clone())
    }

    pub fn guitarists(&self) -> Repository<Guitarist> {
        Repository::new(self.store.clone())
    }

    pub fn comments(&self) -> Repository<Comment> {
        Repository::new(self.store.clone())
    }
}

pub fn router(state: AppState) -> Router {
    // No identity required
    let public_routes = Router::new()
        .route("/api/register", post(public::register::register))
        .route("/api/login", post(public::login::login))
        .route("/api/news", get(public::content::news_list))
        .route("/api/history", get(public::content::history_list))
        .route("/api/guitarists", get(public::content::guitarist_list))
        .route("/api/comments/:id", get(public::content::comment_list));

    // Any authenticated user
    let authenticated = Router::new()
        .route("/api/comments", post(protected::comments::create))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Admin only: the auth layer is added after the guard so it runs first
    let admin = Router::new()
        .route("/api/users", get(elevated::users::list))
        .route(
            "/api/users/:id",
            put(elevated::users::update_role).delete(elevated::users::remove),
        )
        .route("/api/news", post(elevated::news::create))
        .route(
            "/api/news/:id",
            put(elevated::news::update).delete(elevated::news::remove),
        )
        .route("/api/history", post(elevated::history::create))
        .route(
            "/api/history/:id",
            put(elevated::history::update).delete(elevated::history::remove),
        )
        .route("/api/guitarists", post(elevated::guitarists::create))
        .route(
            "/api/guitarists/:id",
            put(elevated::guitarists::update).delete(elevated::guitarists::remove),
        )
        .route("/api/comments/:id", delete(elevated::comments::remove))
        .layer(axum::middleware::from_fn(require_admin))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes)
        .merge(authenticated)
        .merge(admin)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "success",
        "name": "Guitar Club API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "register": "/api/register (POST)",
            "login": "/api/login (POST)",
            "users": "/api/users (GET), /api/users/:id (PUT, DELETE) - admin",
            "news": "/api/news (GET; POST/PUT/DELETE admin)",
            "history": "/api/history (GET; POST/PUT/DELETE admin)",
            "guitarists": "/api/guitarists (GET; POST/PUT/DELETE admin)",
            "comments": "/api/comments (POST auth), /api/comments/:id (GET; DELETE admin)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "success", "store": "ok" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "message": format!("store unavailable: {}", e),
            })),
        ),
    }
}
