//! In-memory document storage

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::storage::{DocumentFilter, Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

#[derive(Debug)]
struct Slot<E> {
    seq: u64,
    entity: E,
}

#[derive(Debug)]
struct Collection<E> {
    slots: HashMap<String, Slot<E>>,
    next_seq: u64,
}

/// Thread-safe in-memory storage
///
/// Entities are listed in insertion order. Top-level string fields named in
/// `unique_fields` are enforced the same way the Postgres backend enforces its
/// unique indexes. Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    collection: RwLock<Collection<E>>,
    unique_fields: Vec<String>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    pub fn new() -> Self {
        Self {
            collection: RwLock::new(Collection {
                slots: HashMap::new(),
                next_seq: 0,
            }),
            unique_fields: Vec::new(),
        }
    }

    /// Reject writes that would give two documents the same value in `fields`
    pub fn with_unique_fields(mut self, fields: &[&str]) -> Self {
        self.unique_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    fn to_document(entity: &E) -> Result<Value, DomainError> {
        serde_json::to_value(entity)
            .map_err(|e| DomainError::storage(format!("Failed to serialize entity: {}", e)))
    }

    /// Returns the first unique field `entity` would collide on, ignoring the
    /// document stored under its own key
    fn unique_violation(
        &self,
        collection: &Collection<E>,
        key: &str,
        entity: &E,
    ) -> Result<Option<String>, DomainError> {
        if self.unique_fields.is_empty() {
            return Ok(None);
        }

        let document = Self::to_document(entity)?;

        for field in &self.unique_fields {
            let Some(value) = document.get(field).and_then(Value::as_str) else {
                continue;
            };

            for (other_key, slot) in &collection.slots {
                if other_key == key {
                    continue;
                }

                let other = Self::to_document(&slot.entity)?;
                if other.get(field).and_then(Value::as_str) == Some(value) {
                    return Ok(Some(field.clone()));
                }
            }
        }

        Ok(None)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Collection<E>>, DomainError> {
        self.collection
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Collection<E>>, DomainError> {
        self.collection
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn ordered(collection: &Collection<E>) -> Vec<&Slot<E>> {
        let mut slots: Vec<&Slot<E>> = collection.slots.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots
    }
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let collection = self.read()?;
        Ok(collection.slots.get(key.as_str()).map(|s| s.entity.clone()))
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let collection = self.read()?;
        Ok(Self::ordered(&collection)
            .into_iter()
            .map(|s| s.entity.clone())
            .collect())
    }

    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<E>, DomainError> {
        let collection = self.read()?;
        let mut found = Vec::new();

        for slot in Self::ordered(&collection) {
            if filter.matches(&Self::to_document(&slot.entity)?) {
                found.push(slot.entity.clone());
            }
        }

        Ok(found)
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut collection = self.write()?;

        if collection.slots.contains_key(&key) {
            return Err(DomainError::duplicate(format!(
                "Entity with key '{}' already exists",
                key
            )));
        }

        if let Some(field) = self.unique_violation(&collection, &key, &entity)? {
            return Err(DomainError::duplicate(format!(
                "Entity with the same '{}' already exists",
                field
            )));
        }

        let seq = collection.next_seq;
        collection.next_seq += 1;
        collection.slots.insert(
            key,
            Slot {
                seq,
                entity: entity.clone(),
            },
        );

        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut collection = self.write()?;

        if !collection.slots.contains_key(&key) {
            return Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            )));
        }

        if let Some(field) = self.unique_violation(&collection, &key, &entity)? {
            return Err(DomainError::duplicate(format!(
                "Entity with the same '{}' already exists",
                field
            )));
        }

        if let Some(slot) = collection.slots.get_mut(&key) {
            slot.entity = entity.clone();
        }

        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let mut collection = self.write()?;
        Ok(collection.slots.remove(key.as_str()).is_some())
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        let collection = self.read()?;
        Ok(collection.slots.contains_key(key.as_str()))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let collection = self.read()?;
        Ok(collection.slots.len())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut collection = self.write()?;
        collection.slots.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    struct Handle(String);

    impl StorageKey for Handle {
        fn as_str(&self) -> &str {
            &self.0
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Member {
        handle: Handle,
        nick: String,
        groups: Vec<String>,
    }

    impl StorageEntity for Member {
        type Key = Handle;

        fn key(&self) -> &Self::Key {
            &self.handle
        }
    }

    fn member(handle: &str, nick: &str, groups: &[&str]) -> Member {
        Member {
            handle: Handle(handle.to_string()),
            nick: nick.to_string(),
            groups: groups.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let storage = InMemoryStorage::new();

        storage.create(member("a", "ann", &[])).await.unwrap();

        let fetched = storage.get(&Handle("a".to_string())).await.unwrap();
        assert_eq!(fetched, Some(member("a", "ann", &[])));
        assert!(storage.get(&Handle("b".to_string())).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_key() {
        let storage = InMemoryStorage::new();

        storage.create(member("a", "ann", &[])).await.unwrap();
        let result = storage.create(member("a", "other", &[])).await;

        assert!(matches!(result, Err(DomainError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn test_unique_field_enforced() {
        let storage = InMemoryStorage::new().with_unique_fields(&["nick"]);

        storage.create(member("a", "ann", &[])).await.unwrap();
        let result = storage.create(member("b", "ann", &[])).await;
        assert!(matches!(result, Err(DomainError::Duplicate { .. })));

        // Re-saving a document under its own key is not a collision
        storage.update(member("a", "ann", &["x"])).await.unwrap();

        storage.create(member("b", "bea", &[])).await.unwrap();
        let result = storage.update(member("b", "ann", &[])).await;
        assert!(matches!(result, Err(DomainError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn test_update_missing() {
        let storage = InMemoryStorage::new();
        let result = storage.update(member("a", "ann", &[])).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let storage = InMemoryStorage::new();

        for handle in ["c", "a", "b"] {
            storage.create(member(handle, handle, &[])).await.unwrap();
        }

        let handles: Vec<String> = storage
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.handle.0)
            .collect();

        assert_eq!(handles, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_find() {
        let storage = InMemoryStorage::new();
        storage.create(member("a", "ann", &["x"])).await.unwrap();
        storage.create(member("b", "bea", &["x", "y"])).await.unwrap();
        storage.create(member("c", "cat", &["y"])).await.unwrap();

        let in_x = storage
            .find(&DocumentFilter::new().contains("groups", "x"))
            .await
            .unwrap();
        assert_eq!(in_x.len(), 2);

        let only_x = storage
            .find(&DocumentFilter::new().contains("groups", "x").array_len("groups", 1))
            .await
            .unwrap();
        assert_eq!(only_x, vec![member("a", "ann", &["x"])]);

        let all = storage.find(&DocumentFilter::new()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_exists_count_clear() {
        let storage = InMemoryStorage::new();
        storage.create(member("a", "ann", &[])).await.unwrap();
        storage.create(member("b", "bea", &[])).await.unwrap();

        assert_eq!(storage.count().await.unwrap(), 2);
        assert!(storage.exists(&Handle("a".to_string())).await.unwrap());

        assert!(storage.delete(&Handle("a".to_string())).await.unwrap());
        assert!(!storage.delete(&Handle("a".to_string())).await.unwrap());
        assert!(!storage.exists(&Handle("a".to_string())).await.unwrap());

        storage.clear().await.unwrap();
        assert_eq!(storage.count().await.unwrap(), 0);
    }
}
