use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{load_book, print_not_found};
use crate::error::Result;
use crate::filter::{filter_indices, Filter};
use crate::fmt::{money, percent, progress_bar};
use crate::plans::parse_plan_ref;

pub fn run(plan: &str, filter: &str, range: &str) -> Result<()> {
    let (settings, book) = load_book()?;
    let id = parse_plan_ref(plan);
    let Some(plan) = book.open(&id)? else {
        print_not_found(&id);
        return Ok(());
    };
    let currency = settings.currency.as_str();
    let progress = book.refresh(&plan)?;

    println!("{} {}", "Cent box".bold(), plan.id.dimmed());
    println!("  Objective: {}", money(plan.objective, currency));
    println!(
        "  Saved:     {} ({} left)",
        money(progress.completed, currency),
        money(progress.remaining(), currency)
    );
    println!(
        "  Progress:  {} {}",
        progress_bar(progress.percentage, 30),
        percent(progress.display_percentage())
    );
    println!("  Boxes:     {}/{}", progress.completed_boxes, progress.total_boxes);
    if plan.completed.is_empty() {
        let hint = format!("Nothing deposited yet. Mark a box with `centbox mark {} 1`.", plan.id);
        println!("  {}", hint.dimmed());
    }

    let filter = Filter::parse(filter, Some(range));
    let indices = filter_indices(&plan.amounts, &plan.completed, filter);
    println!();
    if indices.is_empty() {
        println!("No boxes match filter '{filter}'.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Box", "Amount", "Status"]);
    for index in indices.iter().copied() {
        let status = if plan.completed.contains(index) {
            "deposited".green().to_string()
        } else {
            "pending".dimmed().to_string()
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(money(plan.amounts[index], currency)),
            Cell::new(status),
        ]);
    }
    println!("Boxes ({filter}, {} shown)\n{table}", indices.len());
    Ok(())
}
