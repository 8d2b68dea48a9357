use crate::error::Result;
use crate::plans::PlanBook;
use crate::settings::load_settings;
use crate::store::SqliteStore;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();

    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());
    println!("Currency:   {}", settings.currency);
    println!("Share base: {}", settings.share_base_url);

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {size} bytes");

        let book = PlanBook::new(SqliteStore::open(&db_path)?);
        let plans = book.summaries()?;
        let finished = plans
            .iter()
            .filter(|p| p.progress.total_boxes > 0 && p.progress.completed_boxes == p.progress.total_boxes)
            .count();

        println!();
        println!("Plans:      {}", plans.len());
        println!("Finished:   {finished}");
    } else {
        println!();
        println!("Database not found. Run `centbox init` to set up.");
    }

    Ok(())
}
