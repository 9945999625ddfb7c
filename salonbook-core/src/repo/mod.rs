use crate::{HistoryRecord, Result, ServiceRecord};
use async_trait::async_trait;
use std::path::PathBuf;

pub mod memory;

/// Whole-document storage for the catalog and history arrays.
///
/// Every write replaces the entire document. There is no append mode and no
/// coordination between writers.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // Catalog
    async fn read_catalog(&self) -> Result<Vec<ServiceRecord>>;
    async fn write_catalog(&self, records: &[ServiceRecord]) -> Result<()>;
    /// True only when the catalog document exists and is non-empty.
    async fn catalog_has_data(&self) -> Result<bool>;
    /// No-op when the document is absent.
    async fn delete_catalog(&self) -> Result<()>;

    // History
    async fn read_history(&self) -> Result<Vec<HistoryRecord>>;
    async fn write_history(&self, records: &[HistoryRecord]) -> Result<()>;

    // Snapshots
    async fn write_export(&self, suffix: &str, records: &[ServiceRecord]) -> Result<PathBuf>;
    async fn write_backup(&self, records: &[ServiceRecord]) -> Result<PathBuf>;
}

/// File name for an export snapshot: `services_<suffix>.json`.
pub fn export_file_name(suffix: &str) -> String {
    format!("services_{suffix}.json")
}

/// File name for a backup snapshot taken at `epoch_millis`.
pub fn backup_file_name(epoch_millis: i64) -> String {
    format!("{BACKUP_PREFIX}{epoch_millis}.json")
}

pub const BACKUP_PREFIX: &str = "services_backup_";
