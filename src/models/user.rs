use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_length, ValidationError};
use crate::store::Entity;

/// Access level gating mutation routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(ValidationError("invalid role".into())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2id hash, never serialized to clients (see [`UserView`])
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<Self, ValidationError> {
        check_length("username", &username, 3, Some(50))?;
        validate_email(&email)?;
        Ok(Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            role: Role::User,
            created_at: Utc::now(),
            last_login: None,
        })
    }

    /// Stamp a successful login. The login handler is the only caller.
    pub fn record_login(&mut self) {
        self.last_login = Some(Utc::now());
    }
}

impl Entity for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Client-facing projection of a [`User`] without the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

/// The raw password must clear the schema minimum before hashing
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    check_length("password", password, 6, None)
}

/// Address pattern check: something before '@', and a dot with characters
/// on both sides somewhere after it.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && domain
                .char_indices()
                .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
    });
    if valid {
        Ok(())
    } else {
        Err(ValidationError("email address is not valid".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_closed_set_only() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("superadmin".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn new_user_defaults_to_user_role() {
        let user = User::new("alice".into(), "alice@example.com".into(), "hash".into()).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(user.last_login.is_none());
    }

    #[test]
    fn username_length_is_enforced() {
        assert!(User::new("ab".into(), "a@b.co".into(), "h".into()).is_err());
        assert!(User::new("a".repeat(51), "a@b.co".into(), "h".into()).is_err());
        assert!(User::new("abc".into(), "a@b.co".into(), "h".into()).is_ok());
    }

    #[test]
    fn email_pattern_is_enforced() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a@b.c").is_ok());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@nodot").is_err());
        assert!(validate_email("alice@example.").is_err());
    }

    #[test]
    fn password_minimum_is_enforced() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn view_never_carries_the_hash() {
        let user = User::new("alice".into(), "alice@example.com".into(), "s3cret-hash".into())
            .unwrap();
        let value = serde_json::to_value(UserView::from(user)).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "alice");
    }

    #[test]
    fn wire_format_is_camel_case() {
        let user = User::new("alice".into(), "alice@example.com".into(), "hash".into()).unwrap();
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("passwordHash").is_some());
        let back: User = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, user.id);
    }
}
