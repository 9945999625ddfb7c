use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, StoreError};

pub const CATALOG_DOCUMENT: &str = "services.json";
pub const HISTORY_DOCUMENT: &str = "history.json";

/// Persisted catalog record, one element of `services.json`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceRecord {
    pub id: String,
    pub title: String,
    pub master: String,
    pub cost: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default = "default_status")]
    pub status: bool,
}

fn default_status() -> bool {
    true
}

/// Persisted history record, one element of `history.json`. Date and time are always set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryRecord {
    pub id: String,
    pub title: String,
    pub master: String,
    pub cost: u32,
    pub date: String,
    pub time: String,
}

/// In-memory service shape shared by the catalog and the history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Service {
    pub title: String,
    pub master: String,
    pub cost: u32,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub status: bool,
}

impl Service {
    pub fn new(title: impl Into<String>, master: impl Into<String>, cost: u32) -> Self {
        Self {
            title: title.into(),
            master: master.into(),
            cost,
            date: None,
            time: None,
            status: true,
        }
    }

    pub fn scheduled(mut self, date: NaiveDate, time: NaiveTime) -> Self {
        self.date = Some(date);
        self.time = Some(time);
        self
    }

    pub fn with_status(mut self, status: bool) -> Self {
        self.status = status;
        self
    }

    pub fn to_record(&self) -> ServiceRecord {
        ServiceRecord {
            id: new_id(),
            title: self.title.clone(),
            master: self.master.clone(),
            cost: self.cost,
            date: self.date.map(format_date),
            time: self.time.map(format_time),
            status: self.status,
        }
    }

    /// Fails with a validation error naming the field when date or time is unset.
    pub fn to_history_record(&self) -> Result<HistoryRecord> {
        let date = self.date.ok_or_else(|| StoreError::missing("date"))?;
        let time = self.time.ok_or_else(|| StoreError::missing("time"))?;
        Ok(HistoryRecord {
            id: new_id(),
            title: self.title.clone(),
            master: self.master.clone(),
            cost: self.cost,
            date: format_date(date),
            time: format_time(time),
        })
    }
}

impl ServiceRecord {
    pub fn to_service(&self) -> Result<Service> {
        Ok(Service {
            title: self.title.clone(),
            master: self.master.clone(),
            cost: self.cost,
            date: self
                .date
                .as_deref()
                .map(|d| parse_date(CATALOG_DOCUMENT, d))
                .transpose()?,
            time: self
                .time
                .as_deref()
                .map(|t| parse_time(CATALOG_DOCUMENT, t))
                .transpose()?,
            status: self.status,
        })
    }
}

impl HistoryRecord {
    pub fn to_service(&self) -> Result<Service> {
        Ok(Service {
            title: self.title.clone(),
            master: self.master.clone(),
            cost: self.cost,
            date: Some(parse_date(HISTORY_DOCUMENT, &self.date)?),
            time: Some(parse_time(HISTORY_DOCUMENT, &self.time)?),
            status: true,
        })
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `HH:MM` when seconds are zero, otherwise the shortest form that keeps precision.
pub fn format_time(time: NaiveTime) -> String {
    if time.nanosecond() != 0 {
        time.format("%H:%M:%S%.f").to_string()
    } else if time.second() != 0 {
        time.format("%H:%M:%S").to_string()
    } else {
        time.format("%H:%M").to_string()
    }
}

fn parse_date(document: &str, s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| StoreError::corrupt(document, format!("bad date {s:?}: {e}")))
}

fn parse_time(document: &str, s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| StoreError::corrupt(document, format!("bad time {s:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_text_drops_zero_seconds() {
        let t = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        assert_eq!(format_time(t), "10:00");
        let t = NaiveTime::from_hms_opt(9, 30, 15).unwrap();
        assert_eq!(format_time(t), "09:30:15");
        let t = NaiveTime::from_hms_milli_opt(9, 30, 15, 250).unwrap();
        assert_eq!(format_time(t), "09:30:15.250");
    }

    #[test]
    fn time_text_accepts_short_and_long_forms() {
        let short = parse_time(CATALOG_DOCUMENT, "17:30").unwrap();
        assert_eq!(short, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        let long = parse_time(CATALOG_DOCUMENT, "17:30:05.123456").unwrap();
        assert_eq!(long, NaiveTime::from_hms_micro_opt(17, 30, 5, 123_456).unwrap());
        assert!(parse_time(CATALOG_DOCUMENT, "half past five").unwrap_err().is_corrupt());
    }

    #[test]
    fn history_mapping_names_missing_field() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut s = Service::new("Укладка", "Ольга", 1500);
        s.date = Some(date);
        match s.to_history_record() {
            Err(StoreError::Validation { field, .. }) => assert_eq!(field, "time"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn catalog_record_without_schedule_defaults_active() {
        let rec: ServiceRecord =
            serde_json::from_str(r#"{"id":"a","title":"Укладка","master":"Ольга","cost":1500}"#).unwrap();
        let s = rec.to_service().unwrap();
        assert!(s.status);
        assert_eq!(s.date, None);
        assert_eq!(s.time, None);
        let out = serde_json::to_string(&s.to_record()).unwrap();
        assert!(!out.contains("\"date\""));
    }
}
