use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(name = "salonbook", version, about = "SalonBook service catalog and booking history")]
pub struct Cli {
    /// Directory holding services.json and history.json (defaults to app data dir)
    #[arg(long, env = "SALONBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Number of catalog backups to keep
    #[arg(long, env = "SALONBOOK_KEEP_BACKUPS", default_value_t = salonbook_json::DEFAULT_KEEP_BACKUPS)]
    pub keep_backups: usize,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Service catalog operations
    #[command(subcommand)]
    Services(ServicesCmd),
    /// Book a catalog service into the history
    Book(Slot),
    /// Booking history operations
    #[command(subcommand)]
    History(HistoryCmd),
}

#[derive(Debug, Subcommand, Clone)]
pub enum ServicesCmd {
    List {
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        #[arg(long)]
        inactive: bool,
    },
    Search { query: String },
    /// Sort by title and save the new order
    Sort,
    /// Replace the catalog with the default services
    Reset,
    /// Write services_<SUFFIX>.json next to the catalog
    Export { suffix: String },
    /// Write a timestamped catalog backup
    Backup,
    /// Print the stored catalog as JSON
    Json,
}

#[derive(Debug, Subcommand, Clone)]
pub enum HistoryCmd {
    List,
    Rm {
        #[arg(long)]
        title: String,
        #[arg(long)]
        master: String,
        #[arg(long)]
        date: String,
    },
    /// Move the first matching booking to a new date and time
    Reschedule(Slot),
    /// Print the stored history as JSON
    Json,
}

#[derive(Debug, Args, Clone)]
pub struct Slot {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub master: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: String,
    /// HH:MM
    #[arg(long)]
    pub time: String,
}
