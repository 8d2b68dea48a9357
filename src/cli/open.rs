use crate::board::Board;
use crate::cli::{load_book, print_not_found};
use crate::error::Result;
use crate::plans::parse_plan_ref;
use crate::tui::run_view;

pub fn run(plan: &str) -> Result<()> {
    let (settings, book) = load_book()?;
    let id = parse_plan_ref(plan);
    let Some(plan) = book.open(&id)? else {
        print_not_found(&id);
        return Ok(());
    };
    book.refresh(&plan)?;

    let mut board = Board::new(&book, plan, &settings.currency);
    run_view(&mut board)
}
