use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{self, TokenError};
use crate::error::ApiError;
use crate::models::{Role, User};

/// Authenticated caller context, attached to request extensions for the
/// lifetime of one request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Authentication middleware: validates the bearer token and resolves the
/// caller against the user collection, injecting [`AuthUser`] downstream.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;

    let claims = auth::decode_token(&token, &state.config.security).map_err(|e| match e {
        TokenError::MissingSecret => ApiError::internal("JWT secret not configured"),
        _ => ApiError::unauthorized("invalid token"),
    })?;

    // Fresh lookup on every request so deletions and role changes bite
    let user = state
        .users()
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("user not found"))?;

    request.extensions_mut().insert(AuthUser::from(user));
    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("authorization required"))?;

    let value = header
        .to_str()
        .map_err(|_| ApiError::unauthorized("invalid token"))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ApiError::unauthorized("invalid token")),
    }
}
