// src/library.rs

//! Local game library scanning
//!
//! The library is a flat directory of project folders, each identified by its
//! directory name (the slug) and described by a `manifest.json`. Scanning is
//! tolerant: a folder without a readable manifest is logged and skipped, never
//! fatal to the listing.

use crate::error::{Error, Result};
use crate::manifest::{self, ProjectManifest};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An installed project as seen by the catalog listing
///
/// Ephemeral view recomputed on every scan; never persisted. Identical in
/// content to [`ProjectManifest`] but derived from a successful read.
pub type InstalledProject = ProjectManifest;

/// List every valid project installed under `root`
///
/// Enumerates immediate subdirectories only. Result order follows filesystem
/// enumeration order, which is not stable across platforms; callers use it
/// for display, not correctness.
pub fn list_installed(root: &Path) -> Result<Vec<InstalledProject>> {
    let mut installed = Vec::new();
    if !root.exists() {
        return Ok(installed);
    }

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        match manifest::read_manifest(&entry.path()) {
            Ok(project) => installed.push(project),
            Err(e @ (Error::ManifestMissing(_) | Error::ManifestMalformed { .. })) => {
                warn!("Skipping '{}': {}", entry.path().display(), e);
            }
            Err(e) => return Err(e),
        }
    }

    debug!("Found {} installed projects", installed.len());
    Ok(installed)
}

/// Resolve a project's directory under the library root
pub fn project_dir(root: &Path, id: &str) -> PathBuf {
    root.join(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MANIFEST_FILE;
    use std::fs;
    use tempfile::TempDir;

    fn add_project(root: &Path, id: &str, manifest_json: &str) {
        let dir = root.join(id);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), manifest_json).unwrap();
    }

    #[test]
    fn test_lists_valid_projects() {
        let root = TempDir::new().unwrap();
        add_project(root.path(), "alpha", r#"{"name": "Alpha"}"#);
        add_project(root.path(), "beta", r#"{"name": "Beta", "version": "0.2.0"}"#);

        let mut installed = list_installed(root.path()).unwrap();
        installed.sort_by(|a, b| a.id.cmp(&b.id));

        assert_eq!(installed.len(), 2);
        assert_eq!(installed[0].id, "alpha");
        assert_eq!(installed[1].version, "0.2.0");
    }

    #[test]
    fn test_skips_folders_without_manifest() {
        let root = TempDir::new().unwrap();
        add_project(root.path(), "good", r#"{"name": "Good"}"#);
        fs::create_dir(root.path().join("no-manifest")).unwrap();

        let installed = list_installed(root.path()).unwrap();
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].id, "good");
    }

    #[test]
    fn test_skips_malformed_manifest() {
        let root = TempDir::new().unwrap();
        add_project(root.path(), "good", r#"{"name": "Good"}"#);
        add_project(root.path(), "broken", "{{{{");

        let installed = list_installed(root.path()).unwrap();
        assert_eq!(installed.len(), 1);
    }

    #[test]
    fn test_ignores_loose_files() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("stray.txt"), b"not a project").unwrap();

        assert!(list_installed(root.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let root = TempDir::new().unwrap();
        let nonexistent = root.path().join("nope");

        assert!(list_installed(&nonexistent).unwrap().is_empty());
    }
}
