//! Typed veneer over the document store for a single collection.

use std::marker::PhantomData;
use std::sync::Arc;

use uuid::Uuid;

use super::{DocumentStore, Entity, Filter, StoreError};

pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<T>,
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    pub async fn insert(&self, entity: &T) -> Result<(), StoreError> {
        let doc = serde_json::to_value(entity)?;
        self.store.insert(T::COLLECTION, doc).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        match self.store.find_by_id(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        self.store
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>, StoreError> {
        match self.store.find_one(T::COLLECTION, filter).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// Replace the stored document for this entity. Returns false when the
    /// entity's id no longer resolves (never inserts).
    pub async fn replace(&self, entity: &T) -> Result<bool, StoreError> {
        let doc = serde_json::to_value(entity)?;
        self.store.replace_by_id(T::COLLECTION, entity.id(), doc).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.store.delete_by_id(T::COLLECTION, id).await
    }

    pub async fn delete_many(&self, filter: &Filter) -> Result<u64, StoreError> {
        self.store.delete_many(T::COLLECTION, filter).await
    }
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _phantom: PhantomData,
        }
    }
}
