use colored::Colorize;

use crate::cli::load_book;
use crate::error::Result;
use crate::fmt::money;
use crate::plans::share_url;

pub fn run(objective: f64) -> Result<()> {
    let (settings, book) = load_book()?;
    let summary = book.create(objective)?;

    println!(
        "{} {}",
        "Created plan".green().bold(),
        summary.id.bold()
    );
    println!("  Objective: {}", money(summary.objective, &settings.currency));
    println!("  Boxes:     {}", summary.progress.total_boxes);
    println!("  Link:      {}", share_url(&settings.share_base_url, &summary.id));
    println!();
    println!("Mark deposits with `centbox mark {} <box>` or `centbox open {}`.", summary.id, summary.id);
    Ok(())
}
