//! File-backed storage port
//!
//! One JSON document per collection at `<dir>/<collection>.json`, holding a
//! key -> record map. Every operation is a whole-document read or
//! read-modify-write; collections here are small (one record per media
//! file), so simplicity wins over an index.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::StorageError;

use super::{StoragePort, record_key};

/// Storage port persisting a collection as a single JSON document
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Open the collection named `collection` under `dir`, creating the
    /// directory if needed. The document itself is created lazily on the
    /// first save.
    pub fn open(dir: impl AsRef<Path>, collection: &str) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{collection}.json"));
        debug!(path = %path.display(), "opened json store");
        Ok(Self { path })
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<BTreeMap<String, Value>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_map(&self, map: &BTreeMap<String, Value>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl StoragePort for JsonStore {
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.read_map().await?.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.read_map().await?.remove(key))
    }

    async fn save(&self, record: Value) -> Result<(), StorageError> {
        let key = record_key(&record)?;
        debug!(%key, path = %self.path.display(), "json save");
        let mut map = self.read_map().await?;
        map.insert(key, record);
        self.write_map(&map).await
    }

    async fn all(&self) -> Result<Vec<Value>, StorageError> {
        Ok(self.read_map().await?.into_values().collect())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.read_map().await?.into_keys().collect())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        debug!(path = %self.path.display(), "json clear");
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
