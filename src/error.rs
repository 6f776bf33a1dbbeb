// src/error.rs

//! Error types for the gamedock platform

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the platform
///
/// Partial upload failures during a publish are deliberately NOT an error
/// variant: the publish contract treats them as per-file, non-fatal events
/// reported through [`crate::deploy::PublishReport`].
#[derive(Error, Debug)]
pub enum Error {
    /// Project directory has no manifest.json
    #[error("No manifest.json found in '{0}'")]
    ManifestMissing(PathBuf),

    /// Manifest exists but cannot be parsed into the expected shape
    #[error("Malformed manifest at '{path}': {reason}")]
    ManifestMalformed { path: PathBuf, reason: String },

    /// Network-level failure talking to the deploy backend
    #[error("Deploy backend unreachable: {0}")]
    NetworkUnavailable(String),

    /// The deploy handshake was refused or returned an unusable response
    #[error("Deploy handshake rejected: {0}")]
    HandshakeRejected(String),

    /// Publish requires credentials that were not configured
    #[error("Missing deploy credential: {0}")]
    CredentialsMissing(&'static str),

    /// The batched library install command exited non-zero
    #[error("Dependency sync failed: {0}")]
    DependencySyncFailed(String),

    /// Manifest names an entry point that does not exist on disk
    #[error("Entry point '{entry}' not found in project '{id}'")]
    EntryPointMissing { id: String, entry: String },

    /// Remote asset download returned 404
    #[error("Asset '{file_name}' not found for '{slug}'")]
    AssetNotFound { slug: String, file_name: String },

    /// Failed to spawn the project process
    #[error("Failed to spawn project process: {0}")]
    SpawnFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
