//! Server-issued bearer tokens.
//!
//! Identity travels as a signed HS256 JWT carrying the user id; the auth
//! middleware resolves that id against the user collection on every
//! request, so role changes and deletions take effect immediately.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, expiry_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("token generation failed: {0}")]
    Generation(String),

    #[error("invalid token")]
    Invalid,
}

pub fn generate_token(user_id: Uuid, security: &SecurityConfig) -> Result<String, TokenError> {
    if security.jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    let claims = Claims::new(user_id, security.jwt_expiry_hours);
    let key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| TokenError::Generation(e.to_string()))
}

pub fn decode_token(token: &str, security: &SecurityConfig) -> Result<Claims, TokenError> {
    if security.jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    let key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    decode::<Claims>(token, &key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| TokenError::Invalid)
}
