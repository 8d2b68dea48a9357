mod board;
mod cli;
mod error;
mod filter;
mod fmt;
mod generator;
mod milestones;
mod models;
mod plans;
mod progress;
mod settings;
mod store;
mod tui;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("CENTBOX_LOG", "warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::List) {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Load { path } => cli::load::run(&path),
        Commands::New { objective } => cli::new::run(objective),
        Commands::List => cli::list::run(),
        Commands::Show {
            plan,
            filter,
            range,
        } => cli::show::run(&plan, &filter, &range),
        Commands::Mark { plan, boxes } => cli::mark::run(&plan, &boxes),
        Commands::Open { plan } => cli::open::run(&plan),
        Commands::Share { plan } => cli::share::run(&plan),
        Commands::Delete { plan } => cli::delete::run(&plan),
        Commands::Status => cli::status::run(),
        Commands::Backup { output } => cli::backup::run(output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
