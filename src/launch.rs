// src/launch.rs

//! Dependency-gated launch sequencing
//!
//! Launching a project walks a small state machine:
//!
//! ```text
//! Idle -> ManifestLoaded -> DependenciesSatisfied -> Running
//!              |                     |
//!              +------> Aborted <----+
//! ```
//!
//! No process is ever spawned without a manifest, with unsatisfied
//! libraries, or with a missing entry point; a blocked launch is easier to
//! diagnose than a crashing one. `Running` means successfully detached: the
//! platform does not supervise the child's lifetime, exit code, or output.

use crate::error::{Error, Result};
use crate::library;
use crate::manifest;
use crate::resolver::{self, LibraryResolver};
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// States of one launch attempt
///
/// `Running` and `Aborted` are terminal; there is no "exited" state because
/// the spawned process is not supervised. [`LaunchSequencer::launch`] only
/// ever returns `Running` on success: any `Err` means the attempt terminated
/// in `Aborted` with no process spawned, and [`LaunchState::from_result`]
/// maps an outcome to its terminal state for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Idle,
    ManifestLoaded,
    DependenciesSatisfied,
    Running,
    Aborted,
}

impl LaunchState {
    /// The terminal state a finished launch attempt ended in
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Running,
            Err(_) => Self::Aborted,
        }
    }
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::ManifestLoaded => "manifest-loaded",
            Self::DependenciesSatisfied => "dependencies-satisfied",
            Self::Running => "running",
            Self::Aborted => "aborted",
        };
        write!(f, "{s}")
    }
}

/// The detached-spawn capability the sequencer depends on
///
/// The contract ends at a successful spawn; supervising the child is out of
/// scope.
pub trait ProcessSpawner {
    fn spawn(&self, entry_point: &Path, working_dir: &Path) -> Result<()>;
}

/// [`ProcessSpawner`] that boots the entry point under the pinned
/// interpreter and does not wait
#[derive(Debug, Default)]
pub struct DetachedSpawner;

impl ProcessSpawner for DetachedSpawner {
    fn spawn(&self, entry_point: &Path, working_dir: &Path) -> Result<()> {
        // current_dir lets the project resolve its own relative paths
        Command::new(resolver::PYTHON)
            .args(resolver::interpreter_version_args())
            .arg(entry_point)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| Error::SpawnFailed(e.to_string()))?;
        Ok(())
    }
}

/// Drives a project through manifest load, dependency gate, and spawn
pub struct LaunchSequencer<'a, R: LibraryResolver, S: ProcessSpawner> {
    games_root: &'a Path,
    resolver: &'a R,
    spawner: &'a S,
}

impl<'a, R: LibraryResolver, S: ProcessSpawner> LaunchSequencer<'a, R, S> {
    pub fn new(games_root: &'a Path, resolver: &'a R, spawner: &'a S) -> Self {
        Self {
            games_root,
            resolver,
            spawner,
        }
    }

    /// Launch the project `id`
    ///
    /// Returns `Ok(LaunchState::Running)` once the process has detached. Any
    /// error means the attempt ended in `Aborted` with no process spawned.
    pub fn launch(&self, id: &str) -> Result<LaunchState> {
        let mut state = LaunchState::Idle;
        debug!("Launch '{}': {}", id, state);
        let project_dir = library::project_dir(self.games_root, id);

        let project = manifest::read_manifest(&project_dir)?;
        state = LaunchState::ManifestLoaded;
        debug!("Launch '{}': {}", id, state);

        // Dependency gate: never boot a project known to be missing
        // required libraries.
        if !project.required_libraries.is_empty() {
            info!(
                "Inspecting environment for '{}' ({} libraries)",
                project.name,
                project.required_libraries.len()
            );
            self.resolver.install(&project.required_libraries)?;
        }
        state = LaunchState::DependenciesSatisfied;
        debug!("Launch '{}': {}", id, state);

        let entry_point = project_dir.join(&project.entry);
        if !entry_point.exists() {
            return Err(Error::EntryPointMissing {
                id: project.id,
                entry: project.entry,
            });
        }

        self.spawner.spawn(&entry_point, &project_dir)?;
        state = LaunchState::Running;
        info!("Booted '{}' ({})", project.name, state);
        Ok(state)
    }
}
