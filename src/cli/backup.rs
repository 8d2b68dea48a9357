use std::path::PathBuf;

use rusqlite::backup::Backup;

use crate::cli::load_book;
use crate::error::Result;

pub fn run(output: Option<String>) -> Result<()> {
    let (settings, book) = load_book()?;
    let conn = book.store().connection();

    let dest_path = match output {
        Some(p) => PathBuf::from(p),
        None => {
            let backups_dir = PathBuf::from(&settings.data_dir).join("backups");
            std::fs::create_dir_all(&backups_dir)?;
            let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
            backups_dir.join(format!("centbox-{stamp}.db"))
        }
    };

    let mut dest_conn = rusqlite::Connection::open(&dest_path)?;
    let backup = Backup::new(conn, &mut dest_conn)?;
    backup.run_to_completion(100, std::time::Duration::from_millis(10), None)?;

    let size = std::fs::metadata(&dest_path)?.len();
    println!("Backup saved to {}", dest_path.display());
    println!("Size: {size} bytes");
    Ok(())
}
