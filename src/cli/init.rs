use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path, DB_FILE};
use crate::store::SqliteStore;

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;
    SqliteStore::open(&resolved.join(DB_FILE))?;

    log::info!("initialized data directory {}", resolved.display());
    println!("Initialized centbox at {}", resolved.display());
    Ok(())
}
