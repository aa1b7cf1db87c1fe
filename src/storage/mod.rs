//! Storage port: the async key-value persistence abstraction
//!
//! The session core consumes this trait and never looks behind it. Records
//! are opaque JSON values that carry their own `"key"` field; the port
//! indexes by that key and imposes no other shape. One port instance backs
//! the walk metadata collection, another backs the rating collection.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageError;

mod file;
mod memory;

pub use file::JsonStore;
pub use memory::MemoryStore;

/// Extract the `"key"` field a record must carry to be saved
pub(crate) fn record_key(value: &Value) -> Result<String, StorageError> {
    value
        .get("key")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StorageError::MissingKey(value.to_string()))
}

/// Asynchronous key-value store for one record collection
///
/// Every method is a suspension point; nothing else in the session core
/// blocks. Implementations must be safe to share behind an `Arc`.
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Whether a record exists for `key`
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Fetch the record for `key`, if any
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Save a record, overwriting any prior record with the same key
    ///
    /// The record must carry its own `"key"` field.
    async fn save(&self, record: Value) -> Result<(), StorageError>;

    /// Every record in the collection; order is backend-defined
    async fn all(&self) -> Result<Vec<Value>, StorageError>;

    /// Every record key in the collection
    async fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Wipe the entire collection
    async fn clear(&self) -> Result<(), StorageError>;
}
