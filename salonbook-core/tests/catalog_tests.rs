use chrono::{Local, NaiveDate, NaiveTime};
use salonbook_core::memory::MemoryStore;
use salonbook_core::{CatalogStore, RecordStore, Service, StoreError, DEFAULT_SERVICE_COUNT};
use std::sync::Arc;

fn store() -> (Arc<MemoryStore>, CatalogStore) {
    let mem = Arc::new(MemoryStore::new());
    let catalog = CatalogStore::new(mem.clone());
    (mem, catalog)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[tokio::test]
async fn construction_does_not_seed() {
    let (mem, _catalog) = store();
    assert!(!mem.catalog_has_data().await.unwrap());
}

#[tokio::test]
async fn seeds_once_when_empty() {
    let (_mem, catalog) = store();
    assert!(catalog.seed_if_empty().await.unwrap());
    assert!(!catalog.seed_if_empty().await.unwrap());

    let services = catalog.get_catalog().await.unwrap();
    assert_eq!(services.len(), DEFAULT_SERVICE_COUNT);
    assert_eq!(services[0].title, "Фейд-стрижка");
    assert!(services.iter().all(|s| s.status));

    let today = Local::now().date_naive();
    assert_eq!(services[0].date, Some(today));
    assert_eq!(services[14].date, Some(today + chrono::Duration::days(14)));
    assert_eq!(services[1].time, Some(at(10, 0)));
}

#[tokio::test]
async fn deleted_catalog_is_seeded_again() {
    let (mem, catalog) = store();
    catalog.seed_if_empty().await.unwrap();
    mem.delete_catalog().await.unwrap();
    assert!(catalog.seed_if_empty().await.unwrap());
}

#[tokio::test]
async fn reset_replaces_any_catalog_with_defaults() {
    let (_mem, catalog) = store();
    catalog
        .save_catalog(&[Service::new("Маникюр", "Ира", 900)])
        .await
        .unwrap();

    catalog.reset_to_defaults().await.unwrap();
    let first = catalog.get_catalog().await.unwrap();
    catalog.reset_to_defaults().await.unwrap();
    let second = catalog.get_catalog().await.unwrap();

    assert_eq!(first.len(), DEFAULT_SERVICE_COUNT);
    assert!(first.iter().all(|s| s.title != "Маникюр"));
    let key = |v: &[Service]| v.iter().map(|s| (s.title.clone(), s.master.clone(), s.cost)).collect::<Vec<_>>();
    assert_eq!(key(&first), key(&second));
}

#[tokio::test]
async fn save_then_get_round_trips() {
    let (_mem, catalog) = store();
    let services = vec![
        Service::new("Укладка", "Ольга", 1500).scheduled(day(3), at(15, 0)),
        Service::new("Массаж головы", "Виктор", 1400).with_status(false),
    ];
    catalog.save_catalog(&services).await.unwrap();
    let loaded = catalog.get_catalog().await.unwrap();
    assert_eq!(loaded, services);

    catalog.save_catalog(&loaded).await.unwrap();
    assert_eq!(catalog.get_catalog().await.unwrap(), services);
}

#[tokio::test]
async fn sort_persists_new_order() {
    let (_mem, catalog) = store();
    catalog.seed_if_empty().await.unwrap();
    let sorted = catalog.sort_alphabetically().await.unwrap();
    let titles: Vec<String> = sorted.iter().map(|s| s.title.to_lowercase()).collect();
    assert!(titles.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(catalog.get_catalog().await.unwrap(), sorted);
}

#[tokio::test]
async fn search_and_filter_read_the_catalog() {
    let (_mem, catalog) = store();
    catalog
        .save_catalog(&[
            Service::new("Фейд-стрижка", "Анна", 2400),
            Service::new("Укладка", "Ольга", 1500).with_status(false),
        ])
        .await
        .unwrap();

    let all = catalog.get_catalog().await.unwrap();
    assert_eq!(catalog.search_by_title("").await.unwrap(), all);
    assert_eq!(catalog.search_by_title("   ").await.unwrap(), all);
    assert_eq!(catalog.search_by_title("фейд").await.unwrap().len(), 1);
    assert_eq!(catalog.filter_by_status(false).await.unwrap()[0].title, "Укладка");
}

#[tokio::test]
async fn add_to_history_requires_schedule() {
    let (_mem, catalog) = store();
    let unscheduled = Service::new("Укладка", "Ольга", 1500);
    let err = catalog.add_to_history(&unscheduled).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation { field: "date", .. }));
    assert!(catalog.get_history().await.unwrap().is_empty());

    let booked = unscheduled.scheduled(day(7), at(9, 30));
    catalog.add_to_history(&booked).await.unwrap();
    let history = catalog.get_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].title, "Укладка");
    assert_eq!(history[0].cost, 1500);
    assert_eq!(history[0].date, Some(day(7)));
    assert_eq!(history[0].time, Some(at(9, 30)));
}

#[tokio::test]
async fn remove_from_history_matches_title_master_and_date() {
    let (_mem, catalog) = store();
    let a = Service::new("Укладка", "Ольга", 1500).scheduled(day(7), at(9, 30));
    let same_day_other_time = Service::new("Укладка", "Ольга", 1500).scheduled(day(7), at(17, 0));
    let other_day = Service::new("Укладка", "Ольга", 1500).scheduled(day(8), at(9, 30));
    for s in [&a, &same_day_other_time, &other_day] {
        catalog.add_to_history(s).await.unwrap();
    }

    catalog.remove_from_history(&a).await.unwrap();
    let left = catalog.get_history().await.unwrap();
    assert_eq!(left, vec![other_day.clone()]);

    let stranger = Service::new("Укладка", "Иван", 1500).scheduled(day(8), at(9, 30));
    catalog.remove_from_history(&stranger).await.unwrap();
    assert_eq!(catalog.get_history().await.unwrap(), left);
}

#[tokio::test]
async fn book_service_copies_catalog_entry() {
    let (_mem, catalog) = store();
    catalog.seed_if_empty().await.unwrap();

    assert!(!catalog.book_service("X", "Y", day(1), at(10, 0)).await.unwrap());
    assert!(catalog.get_history().await.unwrap().is_empty());

    assert!(catalog
        .book_service("Укладка", "Ольга", day(1), at(10, 0))
        .await
        .unwrap());
    let history = catalog.get_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].cost, 1500);
    assert_eq!(history[0].date, Some(day(1)));
    assert_eq!(history[0].time, Some(at(10, 0)));
}

#[tokio::test]
async fn reschedule_moves_first_match_only() {
    let (_mem, catalog) = store();
    catalog
        .save_history(&[
            Service::new("Укладка", "Ольга", 1500).scheduled(day(1), at(10, 0)),
            Service::new("Укладка", "Ольга", 1500).scheduled(day(2), at(11, 0)),
        ])
        .await
        .unwrap();

    assert!(catalog
        .reschedule_history_entry("Укладка", "Ольга", day(20), at(18, 45))
        .await
        .unwrap());
    let history = catalog.get_history().await.unwrap();
    assert_eq!(history[0].date, Some(day(20)));
    assert_eq!(history[0].time, Some(at(18, 45)));
    assert_eq!(history[1].date, Some(day(2)));

    assert!(!catalog
        .reschedule_history_entry("Укладка", "Иван", day(20), at(18, 45))
        .await
        .unwrap());
}

#[tokio::test]
async fn snapshots_leave_catalog_untouched() {
    let (mem, catalog) = store();
    catalog.seed_if_empty().await.unwrap();
    let before = mem.read_catalog().await.unwrap();

    let path = catalog.export_snapshot("march").await.unwrap();
    assert_eq!(path.to_str(), Some("services_march.json"));
    assert_eq!(mem.snapshot("services_march.json"), Some(before.clone()));

    let backup = catalog.create_backup().await.unwrap();
    let name = backup.to_string_lossy().to_string();
    assert!(name.starts_with("services_backup_"));
    assert_eq!(mem.snapshot(&name), Some(before.clone()));

    assert_eq!(mem.read_catalog().await.unwrap(), before);
}

#[tokio::test]
async fn export_rejects_bad_suffix() {
    let (_mem, catalog) = store();
    assert!(catalog.export_snapshot("  ").await.unwrap_err().is_validation());
    assert!(catalog.export_snapshot("../etc").await.unwrap_err().is_validation());
    let err = catalog.export_snapshot("backup_1").await.unwrap_err();
    assert!(matches!(err, StoreError::Validation { field: "suffix", .. }));
}

#[tokio::test]
async fn json_text_reflects_persisted_form() {
    let (_mem, catalog) = store();
    catalog
        .save_catalog(&[Service::new("Укладка", "Ольга", 1500)])
        .await
        .unwrap();
    let text = catalog.catalog_json().await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed[0]["title"], "Укладка");
    assert_eq!(parsed[0]["status"], true);
    assert!(parsed[0].get("date").is_none());

    assert_eq!(catalog.history_json().await.unwrap(), "[]");
}
