mod cli;
mod db;
mod error;
mod fmt;
mod importer;
mod models;
mod settings;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("homefinance_import=info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => cli::init::run(cli.db),
        Commands::Import {
            file,
            yes,
            batch_size,
        } => cli::import::run(cli.db, file, yes, batch_size),
        Commands::Status { limit } => cli::status::run(cli.db, limit),
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "Error:".red());
        std::process::exit(1);
    }
}
