use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_length, ValidationError};
use crate::store::Entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guitarist {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Guitarist {
    pub fn new(name: String, bio: String, author: Option<Uuid>) -> Result<Self, ValidationError> {
        validate_fields(&name, &bio)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            bio,
            author,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    pub fn edit(&mut self, name: String, bio: String) -> Result<(), ValidationError> {
        validate_fields(&name, &bio)?;
        self.name = name;
        self.bio = bio;
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}

impl Entity for Guitarist {
    const COLLECTION: &'static str = "guitarists";

    fn id(&self) -> Uuid {
        self.id
    }
}

fn validate_fields(name: &str, bio: &str) -> Result<(), ValidationError> {
    check_length("name", name, 2, Some(50))?;
    check_length("bio", bio, 10, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_bio_constraints() {
        assert!(Guitarist::new("J".into(), "played for decades".into(), None).is_err());
        assert!(Guitarist::new("Jimi".into(), "short bio".into(), None).is_err());
        assert!(Guitarist::new("Jimi".into(), "played for decades".into(), None).is_ok());
    }
}
