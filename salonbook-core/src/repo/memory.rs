use crate::repo::{backup_file_name, export_file_name, RecordStore};
use crate::{HistoryRecord, Result, ServiceRecord};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Keeps both documents and every snapshot in memory.
///
/// `None` for the catalog means the document does not exist.
#[derive(Default)]
pub struct MemoryStore {
    catalog: RwLock<Option<Vec<ServiceRecord>>>,
    history: RwLock<Option<Vec<HistoryRecord>>>,
    snapshots: RwLock<BTreeMap<String, Vec<ServiceRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, name: &str) -> Option<Vec<ServiceRecord>> {
        self.snapshots.read().get(name).cloned()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn read_catalog(&self) -> Result<Vec<ServiceRecord>> {
        Ok(self.catalog.read().clone().unwrap_or_default())
    }

    async fn write_catalog(&self, records: &[ServiceRecord]) -> Result<()> {
        *self.catalog.write() = Some(records.to_vec());
        Ok(())
    }

    async fn catalog_has_data(&self) -> Result<bool> {
        // A written document always has bytes, even when it holds `[]`.
        Ok(self.catalog.read().is_some())
    }

    async fn delete_catalog(&self) -> Result<()> {
        *self.catalog.write() = None;
        Ok(())
    }

    async fn read_history(&self) -> Result<Vec<HistoryRecord>> {
        Ok(self.history.read().clone().unwrap_or_default())
    }

    async fn write_history(&self, records: &[HistoryRecord]) -> Result<()> {
        *self.history.write() = Some(records.to_vec());
        Ok(())
    }

    async fn write_export(&self, suffix: &str, records: &[ServiceRecord]) -> Result<PathBuf> {
        let name = export_file_name(suffix);
        self.snapshots.write().insert(name.clone(), records.to_vec());
        Ok(PathBuf::from(name))
    }

    async fn write_backup(&self, records: &[ServiceRecord]) -> Result<PathBuf> {
        let name = backup_file_name(chrono::Utc::now().timestamp_millis());
        self.snapshots.write().insert(name.clone(), records.to_vec());
        Ok(PathBuf::from(name))
    }
}
