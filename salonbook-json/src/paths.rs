use directories::ProjectDirs;
use std::path::PathBuf;

pub fn data_root() -> PathBuf {
    if let Some(pd) = ProjectDirs::from("com", "salonbook", "SalonBook") {
        pd.data_dir().to_path_buf()
    } else {
        // No home directory to derive from; store next to the process.
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}
