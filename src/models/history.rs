use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_length, ValidationError};
use crate::store::Entity;

/// A club-history article. Same shape as news, but history entries have no
/// comment thread and deleting one cascades nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl History {
    pub fn new(title: String, content: String, author: Option<Uuid>) -> Result<Self, ValidationError> {
        validate_fields(&title, &content)?;
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            content,
            author,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    pub fn edit(&mut self, title: String, content: String) -> Result<(), ValidationError> {
        validate_fields(&title, &content)?;
        self.title = title;
        self.content = content;
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}

impl Entity for History {
    const COLLECTION: &'static str = "history";

    fn id(&self) -> Uuid {
        self.id
    }
}

fn validate_fields(title: &str, content: &str) -> Result<(), ValidationError> {
    check_length("title", title, 3, Some(100))?;
    check_length("content", content, 10, None)
}
