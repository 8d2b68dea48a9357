use colored::Colorize;

use crate::cli::{load_book, print_not_found};
use crate::error::Result;
use crate::plans::{parse_plan_ref, share_url};

pub fn run(plan: &str) -> Result<()> {
    let (settings, book) = load_book()?;
    let id = parse_plan_ref(plan);
    if book.open(&id)?.is_none() {
        print_not_found(&id);
        return Ok(());
    }

    println!("{}", share_url(&settings.share_base_url, &id));
    println!(
        "{}",
        "Plans are stored locally: the link only opens on a machine using this data directory."
            .dimmed()
    );
    Ok(())
}
