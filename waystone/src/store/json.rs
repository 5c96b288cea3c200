use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Destination, DestinationStore, StoreError, destination_key};

/// Destination store backed by a JSON snapshot file. The whole map lives in
/// memory; every mutation rewrites the file so a crash never loses more than
/// the mutation in flight.
pub struct JsonFileStore {
    path: PathBuf,
    records: RwLock<BTreeMap<String, Destination>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, reading the snapshot if one exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = Self::read_snapshot(&path)?;
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    fn read_snapshot(path: &Path) -> Result<BTreeMap<String, Destination>, StoreError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_snapshot(&self, records: &BTreeMap<String, Destination>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }
}

#[async_trait]
impl DestinationStore for JsonFileStore {
    async fn exists(&self, name: &str) -> bool {
        self.records
            .read()
            .await
            .contains_key(&destination_key(name))
    }

    async fn get(&self, name: &str) -> Option<Destination> {
        self.records.read().await.get(&destination_key(name)).cloned()
    }

    async fn put(&self, destination: Destination) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(destination.key.clone(), destination);
        self.write_snapshot(&records)
    }

    async fn delete(&self, name: &str) -> Result<Option<Destination>, StoreError> {
        let mut records = self.records.write().await;
        let removed = records.remove(&destination_key(name));
        if removed.is_some() {
            self.write_snapshot(&records)?;
        }
        Ok(removed)
    }

    async fn list_keys(&self) -> Vec<String> {
        // BTreeMap iteration is already key-ordered.
        self.records.read().await.keys().cloned().collect()
    }

    async fn reload(&self) -> Result<(), StoreError> {
        let fresh = Self::read_snapshot(&self.path)?;
        *self.records.write().await = fresh;
        Ok(())
    }
}
