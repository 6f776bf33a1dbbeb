// src/lib.rs

//! Gamedock
//!
//! Game library platform with content-addressed cloud publishing and
//! dependency-gated launch.
//!
//! # Architecture
//!
//! - Library: a flat directory of project folders, each described by a
//!   `manifest.json`; listings are recomputed on every scan
//! - Publishing: full-tree resynchronization against a content-addressed
//!   deploy backend; only hashes the backend is missing are uploaded
//! - Launching: manifest load, then a mandatory dependency gate, then a
//!   detached process spawn with the project directory as working directory

pub mod config;
pub mod deploy;
mod error;
pub mod hash;
pub mod install;
pub mod launch;
pub mod library;
pub mod manifest;
pub mod remote;
pub mod resolver;

pub use config::RemoteConfig;
pub use deploy::{publish, PublishReport, UploadFailure};
pub use error::{Error, Result};
pub use hash::{index_tree, DeployManifest};
pub use install::install_game;
pub use launch::{DetachedSpawner, LaunchSequencer, LaunchState, ProcessSpawner};
pub use library::{list_installed, InstalledProject};
pub use manifest::{read_manifest, write_manifest, ProjectManifest};
pub use remote::{CatalogIndex, DeployBackend, DeployHandshake, RemoteCatalogClient, StoreEntry};
pub use resolver::{LibraryResolver, PipResolver};
