use async_trait::async_trait;
use salonbook_core::repo::{backup_file_name, export_file_name, RecordStore, BACKUP_PREFIX};
use salonbook_core::{HistoryRecord, Result, ServiceRecord, StoreError, CATALOG_DOCUMENT, HISTORY_DOCUMENT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;
use tracing::{debug, info, warn};

pub mod paths;

pub const DEFAULT_KEEP_BACKUPS: usize = 10;

/// `services.json` and `history.json` inside one application directory.
/// Snapshots and backups are written next to them.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    keep_backups: usize,
}

impl JsonFileStore {
    pub fn open_default() -> Self {
        Self::open_with(paths::data_root(), DEFAULT_KEEP_BACKUPS)
    }

    /// Nothing touches the disk until the first operation.
    pub fn open_with(dir: impl Into<PathBuf>, keep_backups: usize) -> Self {
        Self {
            dir: dir.into(),
            keep_backups: keep_backups.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.join(CATALOG_DOCUMENT)
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.join(HISTORY_DOCUMENT)
    }

    /// Backup files in this directory, oldest first.
    pub async fn list_backups(&self) -> Result<Vec<PathBuf>> {
        let dir = self.dir.clone();
        blocking(move || list_backups(&dir)).await
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Io(io::Error::other(e)))?
}

fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let document = file_label(path);
    let v = serde_json::from_slice::<Vec<T>>(&bytes).map_err(|e| StoreError::corrupt(document, e))?;
    debug!(path = %path.display(), count = v.len(), "read document");
    Ok(v)
}

fn write_array<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let json = serde_json::to_vec_pretty(items).map_err(io::Error::from)?;
    write_atomic(path, &json)?;
    debug!(path = %path.display(), count = items.len(), "wrote document");
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    // On failure the temp file is dropped and the target keeps its old bytes.
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn backup_millis(path: &Path) -> Option<i64> {
    let name = path.file_name()?.to_str()?;
    name.strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

fn list_backups(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut backups: Vec<(i64, PathBuf)> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter_map(|p| backup_millis(&p).map(|ms| (ms, p)))
        .collect();
    backups.sort();
    Ok(backups.into_iter().map(|(_, p)| p).collect())
}

fn rotate_backups(dir: &Path, keep: usize) -> Result<()> {
    let backups = list_backups(dir)?;
    if backups.len() > keep {
        for p in &backups[..backups.len() - keep] {
            info!(path = %p.display(), "removing old backup");
            if let Err(e) = fs::remove_file(p) {
                warn!(path = %p.display(), error = %e, "could not remove old backup");
            }
        }
    }
    Ok(())
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn read_catalog(&self) -> Result<Vec<ServiceRecord>> {
        let path = self.catalog_path();
        blocking(move || read_array(&path)).await
    }

    async fn write_catalog(&self, records: &[ServiceRecord]) -> Result<()> {
        let path = self.catalog_path();
        let records = records.to_vec();
        blocking(move || write_array(&path, &records)).await
    }

    async fn catalog_has_data(&self) -> Result<bool> {
        let path = self.catalog_path();
        blocking(move || match fs::metadata(&path) {
            Ok(m) => Ok(m.len() > 0),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        })
        .await
    }

    async fn delete_catalog(&self) -> Result<()> {
        let path = self.catalog_path();
        blocking(move || match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        })
        .await
    }

    async fn read_history(&self) -> Result<Vec<HistoryRecord>> {
        let path = self.history_path();
        blocking(move || read_array(&path)).await
    }

    async fn write_history(&self, records: &[HistoryRecord]) -> Result<()> {
        let path = self.history_path();
        let records = records.to_vec();
        blocking(move || write_array(&path, &records)).await
    }

    async fn write_export(&self, suffix: &str, records: &[ServiceRecord]) -> Result<PathBuf> {
        let path = self.dir.join(export_file_name(suffix));
        let records = records.to_vec();
        blocking(move || {
            write_array(&path, &records)?;
            Ok(path)
        })
        .await
    }

    async fn write_backup(&self, records: &[ServiceRecord]) -> Result<PathBuf> {
        let dir = self.dir.clone();
        let keep = self.keep_backups;
        let records = records.to_vec();
        blocking(move || {
            let mut millis = chrono::Utc::now().timestamp_millis();
            // Two backups in the same millisecond must not overwrite each other.
            while dir.join(backup_file_name(millis)).exists() {
                millis += 1;
            }
            let path = dir.join(backup_file_name(millis));
            write_array(&path, &records)?;
            rotate_backups(&dir, keep)?;
            Ok(path)
        })
        .await
    }
}
