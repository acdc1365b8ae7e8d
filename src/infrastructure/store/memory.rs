//! In-memory record store

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::application::ports::{RecordStore, StoreError};

/// Record store that lives only as long as the process
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a collection
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Whether a record exists
    pub fn contains(&self, collection: &str, id: &str) -> bool {
        self.collections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(collection)
            .is_some_and(|records| records.contains_key(id))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn save(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError> {
        self.collections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);
        Ok(())
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        if let Some(records) = self
            .collections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(collection)
        {
            records.remove(id);
        }
        Ok(())
    }
}
