// src/manifest.rs

//! Project manifest reading and writing
//!
//! Every project directory carries a `manifest.json` describing its name,
//! version, entry point, and required libraries. The file is authored by the
//! project developer and read-only to the platform; optional fields get
//! defaults so a minimal `{"name": "..."}` manifest is valid. The library
//! list lives under `requirements.libs`, and unknown fields are ignored.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use tracing::debug;

/// On-disk manifest file name within each project directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Default version when the manifest omits one
const DEFAULT_VERSION: &str = "1.0.0";

/// Default entry-point file name when the manifest omits one
pub const DEFAULT_ENTRY: &str = "main.py";

/// Raw wire shape of `manifest.json`
///
/// Kept private: callers only ever see the validated [`ProjectManifest`] with
/// defaults applied.
#[derive(Debug, Deserialize)]
struct RawManifest {
    name: Option<String>,
    version: Option<String>,
    entry: Option<String>,
    #[serde(default)]
    requirements: RawRequirements,
}

#[derive(Debug, Default, Deserialize)]
struct RawRequirements {
    #[serde(default)]
    libs: Vec<String>,
}

/// Wire shape written back out by [`write_manifest`]
#[derive(Debug, Serialize)]
struct RawManifestOut<'a> {
    name: &'a str,
    version: &'a str,
    entry: &'a str,
    requirements: RawRequirementsOut<'a>,
}

#[derive(Debug, Serialize)]
struct RawRequirementsOut<'a> {
    libs: &'a [String],
}

/// A validated project manifest with defaults applied
///
/// `id` is always the containing directory's name; `entry` is a path relative
/// to the project directory that must exist before launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    pub id: String,
    pub name: String,
    pub version: String,
    pub entry: String,
    pub required_libraries: Vec<String>,
}

/// Whether an entry path stays inside the project directory
///
/// Entry points are resolved relative to the project directory and must not
/// be able to address anything outside it. Manifests arrive from the remote
/// store, so an absolute path or any `..` component is rejected, not
/// normalized.
fn entry_is_project_relative(entry: &str) -> bool {
    let path = Path::new(entry);
    !path.is_absolute()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Derive a project's id from its directory path
fn project_id(project_dir: &Path) -> String {
    project_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read and validate the manifest of the project at `project_dir`
///
/// Fails with [`Error::ManifestMissing`] when no `manifest.json` exists and
/// [`Error::ManifestMalformed`] when the document is not a JSON object of the
/// expected shape. Never panics on author-controlled input.
pub fn read_manifest(project_dir: &Path) -> Result<ProjectManifest> {
    let path = project_dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Err(Error::ManifestMissing(project_dir.to_path_buf()));
    }

    let content = fs::read_to_string(&path)?;
    let raw: RawManifest =
        serde_json::from_str(&content).map_err(|e| Error::ManifestMalformed {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    let id = project_id(project_dir);
    let manifest = ProjectManifest {
        name: raw.name.unwrap_or_else(|| id.clone()),
        version: raw.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        entry: raw.entry.unwrap_or_else(|| DEFAULT_ENTRY.to_string()),
        required_libraries: raw.requirements.libs,
        id,
    };

    if !entry_is_project_relative(&manifest.entry) {
        return Err(Error::ManifestMalformed {
            path,
            reason: format!("entry '{}' escapes the project directory", manifest.entry),
        });
    }

    debug!(
        "Read manifest for '{}' v{} (entry: {})",
        manifest.id, manifest.version, manifest.entry
    );
    Ok(manifest)
}

/// Write a manifest back to `project_dir/manifest.json`
///
/// Used for publish-time bookkeeping only; the platform never rewrites a
/// manifest it merely launched.
pub fn write_manifest(project_dir: &Path, manifest: &ProjectManifest) -> Result<()> {
    let raw = RawManifestOut {
        name: &manifest.name,
        version: &manifest.version,
        entry: &manifest.entry,
        requirements: RawRequirementsOut {
            libs: &manifest.required_libraries,
        },
    };

    let path = project_dir.join(MANIFEST_FILE);
    fs::write(&path, serde_json::to_vec_pretty(&raw)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project_dir(root: &TempDir, id: &str, manifest_json: Option<&str>) -> std::path::PathBuf {
        let dir = root.path().join(id);
        fs::create_dir(&dir).unwrap();
        if let Some(json) = manifest_json {
            fs::write(dir.join(MANIFEST_FILE), json).unwrap();
        }
        dir
    }

    #[test]
    fn test_read_full_manifest() {
        let root = TempDir::new().unwrap();
        let dir = project_dir(
            &root,
            "alpha",
            Some(
                r#"{"name": "Alpha", "version": "2.1.0", "entry": "run.py",
                    "requirements": {"libs": ["numpy", "pygame"]}}"#,
            ),
        );

        let manifest = read_manifest(&dir).unwrap();
        assert_eq!(manifest.id, "alpha");
        assert_eq!(manifest.name, "Alpha");
        assert_eq!(manifest.version, "2.1.0");
        assert_eq!(manifest.entry, "run.py");
        assert_eq!(manifest.required_libraries, vec!["numpy", "pygame"]);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let root = TempDir::new().unwrap();
        let dir = project_dir(&root, "bare", Some(r#"{"name": "Bare"}"#));

        let manifest = read_manifest(&dir).unwrap();
        assert_eq!(manifest.version, "1.0.0");
        assert_eq!(manifest.entry, "main.py");
        assert!(manifest.required_libraries.is_empty());
    }

    #[test]
    fn test_name_defaults_to_directory() {
        let root = TempDir::new().unwrap();
        let dir = project_dir(&root, "noname", Some("{}"));

        let manifest = read_manifest(&dir).unwrap();
        assert_eq!(manifest.name, "noname");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let root = TempDir::new().unwrap();
        let dir = project_dir(
            &root,
            "extra",
            Some(r#"{"name": "Extra", "author": "someone", "tags": [1, 2]}"#),
        );

        assert!(read_manifest(&dir).is_ok());
    }

    #[test]
    fn test_missing_manifest() {
        let root = TempDir::new().unwrap();
        let dir = project_dir(&root, "empty", None);

        assert!(matches!(
            read_manifest(&dir),
            Err(Error::ManifestMissing(_))
        ));
    }

    #[test]
    fn test_malformed_manifest() {
        let root = TempDir::new().unwrap();
        let dir = project_dir(&root, "broken", Some("not json at all"));

        assert!(matches!(
            read_manifest(&dir),
            Err(Error::ManifestMalformed { .. })
        ));
    }

    #[test]
    fn test_wrong_typed_field_is_malformed() {
        let root = TempDir::new().unwrap();
        let dir = project_dir(
            &root,
            "badlibs",
            Some(r#"{"name": "Bad", "requirements": {"libs": "numpy"}}"#),
        );

        assert!(matches!(
            read_manifest(&dir),
            Err(Error::ManifestMalformed { .. })
        ));
    }

    #[test]
    fn test_entry_with_parent_component_is_malformed() {
        let root = TempDir::new().unwrap();
        let dir = project_dir(
            &root,
            "sneaky",
            Some(r#"{"name": "Sneaky", "entry": "../../escape.py"}"#),
        );

        assert!(matches!(
            read_manifest(&dir),
            Err(Error::ManifestMalformed { .. })
        ));
    }

    #[test]
    fn test_absolute_entry_is_malformed() {
        let root = TempDir::new().unwrap();
        let dir = project_dir(
            &root,
            "rooted",
            Some(r#"{"name": "Rooted", "entry": "/tmp/escape.py"}"#),
        );

        assert!(matches!(
            read_manifest(&dir),
            Err(Error::ManifestMalformed { .. })
        ));
    }

    #[test]
    fn test_nested_entry_is_allowed() {
        let root = TempDir::new().unwrap();
        let dir = project_dir(
            &root,
            "nested",
            Some(r#"{"name": "Nested", "entry": "src/main.py"}"#),
        );

        assert_eq!(read_manifest(&dir).unwrap().entry, "src/main.py");
    }

    #[test]
    fn test_write_then_read() {
        let root = TempDir::new().unwrap();
        let dir = project_dir(&root, "gamma", None);

        let manifest = ProjectManifest {
            id: "gamma".to_string(),
            name: "Gamma".to_string(),
            version: "1.0.0".to_string(),
            entry: "main.py".to_string(),
            required_libraries: vec!["requests".to_string()],
        };
        write_manifest(&dir, &manifest).unwrap();

        assert_eq!(read_manifest(&dir).unwrap(), manifest);
    }
}
