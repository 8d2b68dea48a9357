use comfy_table::{Cell, Table};

use crate::cli::load_book;
use crate::error::Result;
use crate::fmt::{money, percent, progress_bar};
use crate::models::ProgressSnapshot;

pub fn run() -> Result<()> {
    let (settings, book) = load_book()?;
    let plans = book.list()?;

    if plans.is_empty() {
        println!("No savings plans yet. Create one with `centbox new <objective>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Objective", "Created", "Saved", "Progress", "Boxes"]);
    for plan in &plans {
        let created = chrono::DateTime::parse_from_rfc3339(&plan.created_at)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| plan.created_at.clone());
        let progress = &plan.progress;
        table.add_row(vec![
            Cell::new(&plan.id),
            Cell::new(money(plan.objective, &settings.currency)),
            Cell::new(created),
            Cell::new(money(progress.completed, &settings.currency)),
            Cell::new(progress_cell(progress)),
            Cell::new(format!("{}/{}", progress.completed_boxes, progress.total_boxes)),
        ]);
    }
    println!("Savings plans\n{table}");
    Ok(())
}

fn progress_cell(progress: &ProgressSnapshot) -> String {
    let pct = progress.display_percentage();
    format!("{} {}", progress_bar(pct, 10), percent(pct))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_cell_clamps_percentage() {
        let progress = ProgressSnapshot {
            completed: 10.5,
            total: 10.0,
            percentage: 105.0,
            completed_boxes: 4,
            total_boxes: 4,
        };
        assert_eq!(progress_cell(&progress), format!("{} 100.0%", "█".repeat(10)));
    }
}
