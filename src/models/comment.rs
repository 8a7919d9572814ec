use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_length, ValidationError};
use crate::store::Entity;

/// A comment under a news post. `user_id` is always the authenticated
/// caller's resolved id, never taken from the request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub news_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(news_id: Uuid, user_id: Uuid, text: String) -> Result<Self, ValidationError> {
        check_length("text", &text, 1, Some(500))?;
        Ok(Self {
            id: Uuid::new_v4(),
            news_id,
            user_id,
            text,
            created_at: Utc::now(),
        })
    }
}

impl Entity for Comment {
    const COLLECTION: &'static str = "comments";

    fn id(&self) -> Uuid {
        self.id
    }
}
