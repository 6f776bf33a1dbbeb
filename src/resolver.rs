// src/resolver.rs

//! Dependency resolution via the platform Python toolchain
//!
//! Before a project launches, its declared libraries are installed with one
//! blocking `pip install` covering the whole list. Batching is deliberate:
//! partial installs are not meaningful to the launch gate, and one pip
//! invocation resolves the set together. The interpreter is pinned per
//! platform and is not configurable.

use crate::error::{Error, Result};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Pinned interpreter launcher on Windows
#[cfg(windows)]
pub(crate) const PYTHON: &str = "py";

/// Pinned interpreter on everything else
#[cfg(not(windows))]
pub(crate) const PYTHON: &str = "python3.11";

/// Arguments selecting the pinned interpreter version, if the launcher
/// needs them
pub(crate) fn interpreter_version_args() -> &'static [&'static str] {
    if cfg!(windows) { &["-3.11"] } else { &[] }
}

/// The library-install capability the launch sequencer depends on
pub trait LibraryResolver {
    /// Install every named library, or fail with `DependencySyncFailed`
    ///
    /// An empty list is a no-op success. Implementations must not return
    /// success on a partial install.
    fn install(&self, libraries: &[String]) -> Result<()>;
}

/// Program and arguments of the single pip invocation for `libraries`
fn pip_invocation(libraries: &[String]) -> (&'static str, Vec<String>) {
    let mut args: Vec<String> = interpreter_version_args()
        .iter()
        .map(|a| a.to_string())
        .collect();
    args.extend(["-m", "pip", "install"].map(String::from));
    args.extend(libraries.iter().cloned());
    (PYTHON, args)
}

/// [`LibraryResolver`] backed by the pinned Python's pip
#[derive(Debug, Default)]
pub struct PipResolver;

impl LibraryResolver for PipResolver {
    fn install(&self, libraries: &[String]) -> Result<()> {
        if libraries.is_empty() {
            debug!("No libraries requested, skipping install");
            return Ok(());
        }

        info!("Synchronizing libraries: {}", libraries.join(", "));
        let (program, args) = pip_invocation(libraries);

        let output = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                Error::DependencySyncFailed(format!("Failed to run {program}: {e}"))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            for line in stderr.lines() {
                warn!("[pip] {}", line);
            }
            return Err(Error::DependencySyncFailed(format!(
                "pip exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        info!("Libraries synchronized");
        Ok(())
    }
}
