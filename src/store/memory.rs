//! Volatile in-memory store backend.
//!
//! Backs local development without a database and the integration test
//! suite. Uniqueness checks run under the collection write lock, so a
//! conflicting insert fails atomically just like the Postgres backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::filter::{Direction, Filter};
use super::{document_id, CollectionSpec, DocumentStore, StoreError};

pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<Uuid, Value>>>,
    unique_fields: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new(specs: &[CollectionSpec]) -> Self {
        let mut collections = HashMap::new();
        let mut unique_fields = HashMap::new();
        for spec in specs {
            collections.insert(spec.name.to_string(), HashMap::new());
            unique_fields.insert(
                spec.name.to_string(),
                spec.unique_fields.iter().map(|f| f.to_string()).collect(),
            );
        }
        Self {
            collections: RwLock::new(collections),
            unique_fields,
        }
    }

    fn check_unique(
        &self,
        collection: &str,
        docs: &HashMap<Uuid, Value>,
        candidate: &Value,
        skip_id: Option<Uuid>,
    ) -> Result<(), StoreError> {
        let Some(fields) = self.unique_fields.get(collection) else {
            return Ok(());
        };
        for field in fields {
            let Some(value) = candidate.get(field.as_str()).and_then(Value::as_str) else {
                continue;
            };
            let taken = docs.iter().any(|(id, doc)| {
                Some(*id) != skip_id && doc.get(field.as_str()).and_then(Value::as_str) == Some(value)
            });
            if taken {
                return Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }
}

fn matches(doc: &Value, filter: &Filter) -> bool {
    filter
        .conditions()
        .iter()
        .all(|(field, value)| doc.get(field).and_then(Value::as_str) == Some(value.as_str()))
}

fn sort_documents(docs: &mut [Value], filter: &Filter) {
    let Some(order) = filter.order() else {
        return;
    };
    docs.sort_by(|a, b| {
        let left = order_key(a, &order.field);
        let right = order_key(b, &order.field);
        let ordering = match (&left, &right) {
            // Timestamps compare chronologically, not lexicographically,
            // so differing sub-second precision cannot reorder results.
            (Some((Some(a_ts), _)), Some((Some(b_ts), _))) => a_ts.cmp(b_ts),
            (Some((_, a_raw)), Some((_, b_raw))) => a_raw.cmp(b_raw),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        };
        match order.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });
}

type OrderKey = Option<(Option<DateTime<chrono::FixedOffset>>, String)>;

fn order_key(doc: &Value, field: &str) -> OrderKey {
    let raw = doc.get(field).and_then(Value::as_str)?;
    Some((DateTime::parse_from_rfc3339(raw).ok(), raw.to_string()))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, doc: Value) -> Result<(), StoreError> {
        let id = document_id(&doc)?;
        let mut collections = self.collections.write().await;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        self.check_unique(collection, docs, &doc, None)?;
        docs.insert(id, doc);
        Ok(())
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(docs.get(&id).cloned())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        let mut results: Vec<Value> = docs
            .values()
            .filter(|doc| matches(doc, filter))
            .cloned()
            .collect();
        sort_documents(&mut results, filter);
        Ok(results)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Value>, StoreError> {
        let mut results = self.find(collection, filter).await?;
        if results.is_empty() {
            Ok(None)
        } else {
            Ok(Some(results.swap_remove(0)))
        }
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id: Uuid,
        doc: Value,
    ) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        if !docs.contains_key(&id) {
            return Ok(false);
        }
        self.check_unique(collection, docs, &doc, Some(id))?;
        docs.insert(id, doc);
        Ok(true)
    }

    async fn delete_by_id(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(docs.remove(&id).is_some())
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        let before = docs.len();
        docs.retain(|_, doc| !matches(doc, filter));
        Ok((before - docs.len()) as u64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
