//! JSON file record store
//!
//! One pretty-printed file per collection (`<dir>/<collection>.json`)
//! holding an object keyed by record id. Writers from every process take
//! an exclusive lock on `<dir>/<collection>.json.lock` around each
//! read-modify-write cycle.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::{RecordStore, StoreError};

/// Advisory lock held for one read-modify-write cycle
struct CollectionLock {
    file: File,
}

impl Drop for CollectionLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// File-backed record store
pub struct JsonFileStore {
    dir: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing a collection
    pub fn collection_path(&self, collection: &str) -> Result<PathBuf, StoreError> {
        if collection.is_empty()
            || !collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StoreError::Io(format!(
                "invalid collection name: \"{}\"",
                collection
            )));
        }
        Ok(self.dir.join(format!("{}.json", collection)))
    }

    /// Take the cross-process lock for a collection, waiting for other writers
    async fn lock_collection(&self, collection: &str) -> Result<CollectionLock, StoreError> {
        let path = self.collection_path(collection)?.with_extension("json.lock");
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)?;
            file.lock_exclusive()?;
            Ok::<_, std::io::Error>(CollectionLock { file })
        })
        .await
        .map_err(|e| StoreError::Io(e.to_string()))?
        .map_err(|e| StoreError::Io(format!("failed to lock collection: {}", e)))
    }

    async fn read_collection(&self, collection: &str) -> Result<Map<String, Value>, StoreError> {
        let path = self.collection_path(collection)?;
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            collection: collection.to_string(),
            message: e.to_string(),
        })
    }

    async fn write_collection(
        &self,
        collection: &str,
        records: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let path = self.collection_path(collection)?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let content = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Write then rename so readers never see a partial file
        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp, content)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::Io(e.to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn save(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let _lock = self.lock_collection(collection).await?;
        let mut records = self.read_collection(collection).await?;
        records.insert(id.to_string(), record);
        self.write_collection(collection, &records).await
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let records = self.read_collection(collection).await?;
        Ok(records.into_iter().map(|(_, v)| v).collect())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let _lock = self.lock_collection(collection).await?;
        let mut records = self.read_collection(collection).await?;
        if records.remove(id).is_some() {
            self.write_collection(collection, &records).await?;
        }
        Ok(())
    }
}
