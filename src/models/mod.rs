//! Entity schemas: the five record shapes and their field constraints.

pub mod comment;
pub mod guitarist;
pub mod history;
pub mod news;
pub mod user;

pub use comment::Comment;
pub use guitarist::Guitarist;
pub use history::History;
pub use news::News;
pub use user::{Role, User, UserView};

use thiserror::Error;

use crate::store::{CollectionSpec, Entity};

/// A field value that violates the entity schema
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Collections this service persists, with their store-enforced unique
/// fields. Both store backends are initialized from this list.
pub fn collections() -> Vec<CollectionSpec> {
    vec![
        CollectionSpec {
            name: User::COLLECTION,
            unique_fields: &["email"],
        },
        CollectionSpec {
            name: News::COLLECTION,
            unique_fields: &[],
        },
        CollectionSpec {
            name: History::COLLECTION,
            unique_fields: &[],
        },
        CollectionSpec {
            name: Guitarist::COLLECTION,
            unique_fields: &[],
        },
        CollectionSpec {
            name: Comment::COLLECTION,
            unique_fields: &[],
        },
    ]
}

pub(crate) fn check_length(
    field: &str,
    value: &str,
    min: usize,
    max: Option<usize>,
) -> Result<(), ValidationError> {
    let length = value.chars().count();
    if length < min {
        return Err(ValidationError(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if let Some(max) = max {
        if length > max {
            return Err(ValidationError(format!(
                "{} must be at most {} characters",
                field, max
            )));
        }
    }
    Ok(())
}
