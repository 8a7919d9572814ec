use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::AuthUser;
use crate::error::ApiError;
use crate::models::Role;

/// Admin guard: a pure predicate on the caller already resolved by
/// [`super::auth::require_auth`], which must be layered outside this one.
/// Never touches storage.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("authorization required"))?;

    if user.role != Role::Admin {
        return Err(ApiError::forbidden("access denied"));
    }

    Ok(next.run(request).await)
}
