//! Record store port interface

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Record store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    Io(String),

    #[error("Failed to serialize record: {0}")]
    Serialization(String),

    #[error("Collection '{collection}' is corrupt: {message}")]
    Corrupt { collection: String, message: String },
}

/// Port for the local key-value record store.
///
/// Records are grouped into named collections and addressed by id.
/// The store treats records as opaque JSON values.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or replace a record.
    ///
    /// # Arguments
    /// * `collection` - Collection name
    /// * `id` - Record id, unique within the collection
    /// * `record` - The record body
    async fn save(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError>;

    /// Load every record in a collection. A missing collection is empty.
    async fn get_all(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    /// Delete a record. Deleting an unknown id is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Blanket implementation for boxed store types
#[async_trait]
impl RecordStore for Box<dyn RecordStore> {
    async fn save(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError> {
        self.as_ref().save(collection, id, record).await
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        self.as_ref().get_all(collection).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.as_ref().delete(collection, id).await
    }
}
