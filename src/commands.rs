// src/commands.rs
//! Command implementations for the gamedock CLI
//!
//! Thin presentation layer: each function maps one subcommand onto the
//! library and prints the result. All policy lives in the library crate.

use anyhow::Result;
use gamedock::remote::DeployBackend;
use gamedock::{
    DetachedSpawner, LaunchSequencer, LaunchState, PipResolver, RemoteCatalogClient, RemoteConfig,
};
use std::path::Path;

fn client() -> Result<RemoteCatalogClient> {
    Ok(RemoteCatalogClient::new(RemoteConfig::from_env())?)
}

/// `gamedock list`
pub fn list(games_dir: &Path) -> Result<()> {
    let installed = gamedock::list_installed(games_dir)?;
    if installed.is_empty() {
        println!("No games installed under '{}'", games_dir.display());
        return Ok(());
    }

    for project in installed {
        println!("{:<20} {:<10} {}", project.id, project.version, project.name);
    }
    Ok(())
}

/// `gamedock store`
pub fn store() -> Result<()> {
    let entries = client()?.fetch_games();
    if entries.is_empty() {
        println!("The store is empty (or unreachable)");
        return Ok(());
    }

    for entry in entries {
        println!("{:<20} {}", entry.id, entry.display_name);
    }
    Ok(())
}

/// `gamedock install <slug>`
pub fn install(games_dir: &Path, slug: &str) -> Result<()> {
    let project = gamedock::install_game(&client()?, games_dir, slug)?;
    println!("Installed '{}' v{}", project.name, project.version);
    Ok(())
}

/// `gamedock publish <slug>`
pub fn publish(games_dir: &Path, slug: &str) -> Result<()> {
    let report = gamedock::publish(&client()?, games_dir, slug)?;

    println!(
        "Deploy {}: {} uploaded, {} already on backend",
        report.deploy_id, report.uploaded, report.skipped
    );
    if !report.is_complete() {
        println!(
            "WARNING: {} file(s) failed to upload; the deploy is incomplete:",
            report.failed.len()
        );
        for failure in &report.failed {
            println!("  {} ({})", failure.remote_path, failure.reason);
        }
    }
    Ok(())
}

/// `gamedock launch <slug>`
pub fn launch(games_dir: &Path, slug: &str) -> Result<()> {
    let resolver = PipResolver;
    let spawner = DetachedSpawner;
    let result = LaunchSequencer::new(games_dir, &resolver, &spawner).launch(slug);
    println!("'{slug}' is {}", LaunchState::from_result(&result));
    result?;
    Ok(())
}
