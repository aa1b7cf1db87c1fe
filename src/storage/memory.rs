//! In-memory storage port
//!
//! Backed by a shared map; used by tests and as a scratch backend. Cloning
//! yields a handle onto the same collection.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StorageError;

use super::{StoragePort, record_key};

/// Storage port over a shared in-memory map
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl StoragePort for MemoryStore {
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.records.read().await.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn save(&self, record: Value) -> Result<(), StorageError> {
        let key = record_key(&record)?;
        debug!(%key, "memory save");
        self.records.write().await.insert(key, record);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Value>, StorageError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.records.read().await.keys().cloned().collect())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        debug!("memory clear");
        self.records.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_and_get() {
        let store = MemoryStore::new();
        store.save(json!({"key": "a", "score": 3})).await.unwrap();

        assert!(store.exists("a").await.unwrap());
        assert!(!store.exists("b").await.unwrap());

        let record = store.get("a").await.unwrap().unwrap();
        assert_eq!(record["score"], 3);
        assert!(store.get("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = MemoryStore::new();
        store.save(json!({"key": "a", "score": 1})).await.unwrap();
        store.save(json!({"key": "a", "score": 5})).await.unwrap();

        assert_eq!(store.len().await, 1);
        let record = store.get("a").await.unwrap().unwrap();
        assert_eq!(record["score"], 5);
    }

    #[tokio::test]
    async fn test_save_requires_key_field() {
        let store = MemoryStore::new();
        let result = store.save(json!({"score": 1})).await;
        assert!(matches!(result, Err(StorageError::MissingKey(_))));
    }

    #[tokio::test]
    async fn test_keys_and_all() {
        let store = MemoryStore::new();
        store.save(json!({"key": "b"})).await.unwrap();
        store.save(json!({"key": "a"})).await.unwrap();

        assert_eq!(store.keys().await.unwrap(), vec!["a", "b"]);
        assert_eq!(store.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::new();
        store.save(json!({"key": "a"})).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clone_shares_records() {
        let store = MemoryStore::new();
        let alias = store.clone();
        store.save(json!({"key": "a"})).await.unwrap();
        assert!(alias.exists("a").await.unwrap());
    }
}
