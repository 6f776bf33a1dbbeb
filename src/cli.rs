// src/cli.rs
//! CLI definitions for the gamedock platform
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gamedock")]
#[command(author = "Gamedock Project")]
#[command(version)]
#[command(about = "Game library with content-addressed publishing and gated launch", long_about = None)]
pub struct Cli {
    /// Local library directory
    #[arg(long, default_value = gamedock::config::DEFAULT_GAMES_DIR, global = true)]
    pub games_dir: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List installed games
    List,

    /// List games published on the remote store
    Store,

    /// Download a published game into the local library
    Install {
        /// Catalog slug of the game
        slug: String,
    },

    /// Publish a local game to the remote store
    ///
    /// Resynchronizes the whole library tree; only content the backend is
    /// missing is uploaded.
    Publish {
        /// Directory name of the game under the library
        slug: String,
    },

    /// Launch an installed game after its dependency gate
    Launch {
        /// Directory name of the game under the library
        slug: String,
    },
}
