use chrono::{Local, NaiveDate, NaiveTime};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::defaults::default_services;
use crate::filters::{filter_by_status, search_by_title, sort_by_title};
use crate::models::{format_date, format_time};
use crate::repo::{export_file_name, RecordStore, BACKUP_PREFIX};
use crate::{HistoryRecord, Result, Service, ServiceRecord, StoreError};

/// Business operations over the catalog and history documents.
///
/// Every mutation reads the whole document, changes it in memory and writes
/// the whole document back. Seeding is not done on construction; call
/// [`CatalogStore::seed_if_empty`] once at startup.
pub struct CatalogStore {
    records: Arc<dyn RecordStore>,
}

impl CatalogStore {
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Writes the default catalog when the catalog document is missing or empty.
    pub async fn seed_if_empty(&self) -> Result<bool> {
        if self.records.catalog_has_data().await? {
            return Ok(false);
        }
        self.write_defaults().await?;
        info!("seeded catalog with default services");
        Ok(true)
    }

    /// Deletes the catalog document and writes the defaults again, whatever it held.
    pub async fn reset_to_defaults(&self) -> Result<()> {
        self.records.delete_catalog().await?;
        self.write_defaults().await?;
        info!("catalog reset to defaults");
        Ok(())
    }

    async fn write_defaults(&self) -> Result<()> {
        let defaults = default_services(Local::now().naive_local());
        self.save_catalog(&defaults).await
    }

    // ===== Catalog =====

    pub async fn get_catalog(&self) -> Result<Vec<Service>> {
        let records = self.records.read_catalog().await?;
        records.iter().map(ServiceRecord::to_service).collect()
    }

    pub async fn save_catalog(&self, services: &[Service]) -> Result<()> {
        let records: Vec<ServiceRecord> = services.iter().map(Service::to_record).collect();
        debug!(count = records.len(), "writing catalog");
        self.records.write_catalog(&records).await
    }

    pub async fn filter_by_status(&self, active: bool) -> Result<Vec<Service>> {
        Ok(filter_by_status(&self.get_catalog().await?, active))
    }

    pub async fn search_by_title(&self, query: &str) -> Result<Vec<Service>> {
        Ok(search_by_title(&self.get_catalog().await?, query))
    }

    /// Sorts the catalog by title and persists the new order.
    pub async fn sort_alphabetically(&self) -> Result<Vec<Service>> {
        let mut services = self.get_catalog().await?;
        sort_by_title(&mut services);
        self.save_catalog(&services).await?;
        Ok(services)
    }

    /// Copies the persisted catalog to `services_<suffix>.json`.
    pub async fn export_snapshot(&self, suffix: &str) -> Result<PathBuf> {
        let suffix = suffix.trim();
        if suffix.is_empty() {
            return Err(StoreError::missing("suffix"));
        }
        if suffix.contains(['/', '\\']) || suffix.contains("..") {
            return Err(StoreError::Validation {
                field: "suffix",
                reason: "must not contain path components",
            });
        }
        if export_file_name(suffix).starts_with(BACKUP_PREFIX) {
            return Err(StoreError::Validation {
                field: "suffix",
                reason: "must not start with backup_",
            });
        }
        let records = self.records.read_catalog().await?;
        let path = self.records.write_export(suffix, &records).await?;
        info!(path = %path.display(), "exported catalog");
        Ok(path)
    }

    /// Copies the persisted catalog to a timestamped backup file.
    pub async fn create_backup(&self) -> Result<PathBuf> {
        let records = self.records.read_catalog().await?;
        let path = self.records.write_backup(&records).await?;
        info!(path = %path.display(), "backed up catalog");
        Ok(path)
    }

    pub async fn catalog_json(&self) -> Result<String> {
        let records = self.records.read_catalog().await?;
        to_pretty_json(&records)
    }

    // ===== History =====

    pub async fn get_history(&self) -> Result<Vec<Service>> {
        let records = self.records.read_history().await?;
        records.iter().map(HistoryRecord::to_service).collect()
    }

    /// Fails without touching storage if any item lacks a date or a time.
    pub async fn save_history(&self, services: &[Service]) -> Result<()> {
        let records = services
            .iter()
            .map(Service::to_history_record)
            .collect::<Result<Vec<_>>>()?;
        debug!(count = records.len(), "writing history");
        self.records.write_history(&records).await
    }

    pub async fn add_to_history(&self, service: &Service) -> Result<()> {
        let record = service.to_history_record()?;
        let mut history = self.records.read_history().await?;
        history.push(record);
        self.records.write_history(&history).await
    }

    /// Drops every history record with the same title, master and date.
    /// Matching nothing is not an error.
    pub async fn remove_from_history(&self, service: &Service) -> Result<()> {
        let date = service.date.map(format_date);
        let mut history = self.records.read_history().await?;
        let before = history.len();
        history.retain(|h| {
            !(h.title == service.title && h.master == service.master && Some(&h.date) == date.as_ref())
        });
        if history.len() == before {
            warn!(title = %service.title, master = %service.master, "no history entry to remove");
        }
        self.records.write_history(&history).await
    }

    /// Books the first catalog service with this title and master. Returns
    /// `false` when there is none.
    pub async fn book_service(
        &self,
        title: &str,
        master: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<bool> {
        let catalog = self.get_catalog().await?;
        let Some(found) = catalog.into_iter().find(|s| s.title == title && s.master == master) else {
            warn!(title, master, "no catalog service to book");
            return Ok(false);
        };
        self.add_to_history(&found.scheduled(date, time)).await?;
        Ok(true)
    }

    /// Moves the first history entry with this title and master to a new slot,
    /// whatever its current date and time.
    pub async fn reschedule_history_entry(
        &self,
        title: &str,
        master: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<bool> {
        let mut history = self.records.read_history().await?;
        let Some(entry) = history
            .iter_mut()
            .find(|h| h.title == title && h.master == master)
        else {
            warn!(title, master, "no history entry to reschedule");
            return Ok(false);
        };
        entry.date = format_date(date);
        entry.time = format_time(time);
        self.records.write_history(&history).await?;
        Ok(true)
    }

    pub async fn history_json(&self) -> Result<String> {
        let records = self.records.read_history().await?;
        to_pretty_json(&records)
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| StoreError::Io(e.into()))
}
