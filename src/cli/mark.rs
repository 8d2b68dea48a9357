use colored::Colorize;

use crate::cli::{load_book, print_not_found};
use crate::error::{CentboxError, Result};
use crate::fmt::{money, percent};
use crate::plans::parse_plan_ref;

/// Mark boxes by their 1-based number, printing any milestones reached.
pub fn run(plan: &str, boxes: &[usize]) -> Result<()> {
    let (settings, book) = load_book()?;
    let id = parse_plan_ref(plan);
    let Some(mut plan) = book.open(&id)? else {
        print_not_found(&id);
        return Ok(());
    };
    let currency = settings.currency.as_str();

    for &number in boxes {
        let index = number.checked_sub(1).ok_or(CentboxError::BoxOutOfRange {
            index: 0,
            total: plan.amounts.len(),
        })?;
        let outcome = book.mark(&mut plan, index).map_err(|e| match e {
            CentboxError::BoxOutOfRange { total, .. } => CentboxError::BoxOutOfRange {
                index: number,
                total,
            },
            other => other,
        })?;

        if outcome.newly_marked {
            println!(
                "Box #{number} deposited: {}",
                money(plan.amounts[index], currency).green()
            );
        } else {
            println!("Box #{number} was already deposited");
        }
        for celebration in &outcome.celebrations {
            println!();
            println!(
                "{} {}",
                celebration.icon,
                celebration.title.yellow().bold()
            );
            println!("   {}", celebration.message);
            println!();
        }
    }

    let progress = plan.progress();
    println!(
        "Saved {} of {} ({}), {}/{} boxes",
        money(progress.completed, currency),
        money(progress.total, currency),
        percent(progress.display_percentage()),
        progress.completed_boxes,
        progress.total_boxes
    );
    Ok(())
}
