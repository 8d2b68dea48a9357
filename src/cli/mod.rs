pub mod backup;
pub mod delete;
pub mod init;
pub mod list;
pub mod load;
pub mod mark;
pub mod new;
pub mod open;
pub mod share;
pub mod show;
pub mod status;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::error::{CentboxError, Result};
use crate::plans::PlanBook;
use crate::settings::{load_settings, Settings};
use crate::store::SqliteStore;

/// Open the plan book in the configured data directory.
pub(crate) fn open_book(settings: &Settings) -> Result<PlanBook<SqliteStore>> {
    let db_path = settings.db_path();
    if !db_path.exists() {
        return Err(CentboxError::Settings(format!(
            "No database found at {}\nRun `centbox init` to set up.",
            db_path.display()
        )));
    }
    Ok(PlanBook::new(SqliteStore::open(&db_path)?))
}

pub(crate) fn load_book() -> Result<(Settings, PlanBook<SqliteStore>)> {
    let settings = load_settings();
    let book = open_book(&settings)?;
    Ok((settings, book))
}

/// Shown instead of an error when a plan id does not resolve.
pub(crate) fn print_not_found(id: &str) {
    println!("{}", "Savings plan not found".yellow().bold());
    println!("No plan with id '{id}' exists here, or its data was removed.");
    println!("Create a new one with `centbox new <objective>`.");
}

#[derive(Parser)]
#[command(name = "centbox", about = "Cent-box savings challenge tracker.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up centbox: choose a data directory and initialize the database.
    Init {
        /// Path for centbox data (default: ~/Documents/centbox)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Switch to an existing centbox data directory.
    Load {
        /// Path to data directory containing centbox.db
        path: String,
    },
    /// Create a savings plan for an objective amount.
    New {
        /// Objective, e.g. 667.95
        objective: f64,
    },
    /// List saved plans with their progress.
    List,
    /// Show a plan's progress and boxes.
    Show {
        /// Plan id or share link
        plan: String,
        /// Which boxes to list: all, completed, pending, range
        #[arg(long, default_value = "all")]
        filter: String,
        /// Amount band for --filter range: 0-10, 10-50, 50-100, 100+
        #[arg(long, default_value = "0-10")]
        range: String,
    },
    /// Mark one or more boxes as deposited (box numbers start at 1).
    Mark {
        /// Plan id or share link
        plan: String,
        /// Box numbers to mark
        #[arg(required = true)]
        boxes: Vec<usize>,
    },
    /// Interactively mark boxes on a grid.
    Open {
        /// Plan id or share link
        plan: String,
    },
    /// Print the share link of a plan.
    Share {
        /// Plan id
        plan: String,
    },
    /// Delete a plan and its data.
    Delete {
        /// Plan id or share link
        plan: String,
    },
    /// Show settings, database location and plan count.
    Status,
    /// Back up the database.
    Backup {
        /// Output path (default: <data_dir>/backups/centbox-YYYYMMDD-HHMMSS.db)
        #[arg(long)]
        output: Option<String>,
    },
}
