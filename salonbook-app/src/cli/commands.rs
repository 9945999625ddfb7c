use crate::cli::opts::*;

use anyhow::{anyhow, bail, Result};
use chrono::{NaiveDate, NaiveTime};
use salonbook_core::{format_date, format_time, CatalogStore, Service};
use salonbook_json::paths::data_root;
use salonbook_json::JsonFileStore;
use std::sync::Arc;

/// Builds the single store pair for this process and runs the explicit seeding step.
pub async fn open_catalog(args: &Cli) -> Result<CatalogStore> {
    let dir = args.data_dir.clone().unwrap_or_else(data_root);
    let files = JsonFileStore::open_with(dir, args.keep_backups);
    tracing::debug!(dir = %files.dir().display(), "opening store");
    let catalog = CatalogStore::new(Arc::new(files));
    catalog.seed_if_empty().await?;
    Ok(catalog)
}

pub async fn run_cli(args: Cli) -> Result<()> {
    let catalog = open_catalog(&args).await?;
    match args.cmd {
        Command::Services(cmd) => services_cmd(&catalog, cmd).await,
        Command::Book(slot) => book_cmd(&catalog, slot).await,
        Command::History(cmd) => history_cmd(&catalog, cmd).await,
    }
}

async fn services_cmd(catalog: &CatalogStore, cmd: ServicesCmd) -> Result<()> {
    match cmd {
        ServicesCmd::List { active, inactive } => {
            let v = if active {
                catalog.filter_by_status(true).await?
            } else if inactive {
                catalog.filter_by_status(false).await?
            } else {
                catalog.get_catalog().await?
            };
            print_services(&v);
        }
        ServicesCmd::Search { query } => print_services(&catalog.search_by_title(&query).await?),
        ServicesCmd::Sort => print_services(&catalog.sort_alphabetically().await?),
        ServicesCmd::Reset => {
            catalog.reset_to_defaults().await?;
            println!("ok");
        }
        ServicesCmd::Export { suffix } => {
            let path = catalog.export_snapshot(&suffix).await?;
            println!("wrote {}", path.display());
        }
        ServicesCmd::Backup => {
            let path = catalog.create_backup().await?;
            println!("wrote {}", path.display());
        }
        ServicesCmd::Json => println!("{}", catalog.catalog_json().await?),
    }
    Ok(())
}

async fn book_cmd(catalog: &CatalogStore, slot: Slot) -> Result<()> {
    let (date, time) = (parse_date(&slot.date)?, parse_time(&slot.time)?);
    if !catalog.book_service(&slot.title, &slot.master, date, time).await? {
        bail!("no matching service: {} / {}", slot.title, slot.master);
    }
    println!("ok");
    Ok(())
}

async fn history_cmd(catalog: &CatalogStore, cmd: HistoryCmd) -> Result<()> {
    match cmd {
        HistoryCmd::List => print_services(&catalog.get_history().await?),
        HistoryCmd::Rm { title, master, date } => {
            let mut entry = Service::new(title, master, 0);
            entry.date = Some(parse_date(&date)?);
            catalog.remove_from_history(&entry).await?;
            println!("ok");
        }
        HistoryCmd::Reschedule(slot) => {
            let (date, time) = (parse_date(&slot.date)?, parse_time(&slot.time)?);
            if !catalog
                .reschedule_history_entry(&slot.title, &slot.master, date, time)
                .await?
            {
                bail!("no matching service: {} / {}", slot.title, slot.master);
            }
            println!("ok");
        }
        HistoryCmd::Json => println!("{}", catalog.history_json().await?),
    }
    Ok(())
}

// ===== Helpers =====
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| anyhow!("invalid date (want YYYY-MM-DD): {s}"))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| anyhow!("invalid time (want HH:MM): {s}"))
}

fn print_services(v: &[Service]) {
    for s in v {
        println!("{}", service_line(s));
    }
}

fn service_line(s: &Service) -> String {
    let date = s.date.map(format_date).unwrap_or_else(|| "-".to_string());
    let time = s.time.map(format_time).unwrap_or_else(|| "-".to_string());
    let status = if s.status { "active" } else { "inactive" };
    format!("{}\t{}\t{}\t{}\t{}\t{}", s.title, s.master, s.cost, date, time, status)
}
