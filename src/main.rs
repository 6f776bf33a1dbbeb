// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let games_dir = Path::new(&cli.games_dir);

    match cli.command {
        Commands::List => commands::list(games_dir),
        Commands::Store => commands::store(),
        Commands::Install { slug } => commands::install(games_dir, &slug),
        Commands::Publish { slug } => commands::publish(games_dir, &slug),
        Commands::Launch { slug } => commands::launch(games_dir, &slug),
    }
}
