use crate::cli::{load_book, print_not_found};
use crate::error::Result;
use crate::plans::parse_plan_ref;

pub fn run(plan: &str) -> Result<()> {
    let (_, book) = load_book()?;
    let id = parse_plan_ref(plan);
    if book.delete(&id)? {
        println!("Deleted plan {id}");
    } else {
        print_not_found(&id);
    }
    Ok(())
}
