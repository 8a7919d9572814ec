//! Persistence gateway: a collection-oriented document store behind a trait.
//!
//! Documents are JSON objects addressed by collection name with a server
//! generated UUID under `"id"`. Two backends exist: [`PgStore`] (one JSONB
//! table per collection) and [`MemoryStore`] (volatile, used for local
//! development and by the test suite).

pub mod filter;
pub mod memory;
pub mod postgres;
pub mod repository;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub use filter::Filter;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::Repository;

/// Errors surfaced by a document store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for unique field \"{field}\" in \"{collection}\"")]
    Duplicate { collection: String, field: String },

    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("malformed document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Static description of a collection, including the fields the store must
/// keep unique so that a conflicting insert fails atomically.
#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub unique_fields: &'static [&'static str],
}

/// A typed record that lives in a named collection
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// The opaque query interface all handlers go through
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document. Fails with [`StoreError::Duplicate`] when a
    /// registered unique field collides with an existing document.
    async fn insert(&self, collection: &str, doc: Value) -> Result<(), StoreError>;

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError>;

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError>;

    async fn find_one(&self, collection: &str, filter: &Filter)
        -> Result<Option<Value>, StoreError>;

    /// Replace an existing document wholesale. Returns false when the id
    /// does not resolve; never inserts.
    async fn replace_by_id(
        &self,
        collection: &str,
        id: Uuid,
        doc: Value,
    ) -> Result<bool, StoreError>;

    /// Returns false when the id does not resolve.
    async fn delete_by_id(&self, collection: &str, id: Uuid) -> Result<bool, StoreError>;

    /// Delete every document matching the filter, returning the count.
    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Validate collection and field names used to build queries. Accepts
/// ASCII alphanumerics and underscores, starting with a letter.
pub(crate) fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

/// Pull the primary key out of a document about to be written
pub(crate) fn document_id(doc: &Value) -> Result<Uuid, StoreError> {
    doc.get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| StoreError::InvalidDocument("missing or malformed \"id\" field".into()))
}
