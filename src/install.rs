// src/install.rs

//! Installing published games into the local library
//!
//! Downloads a game's assets from the remote into `<root>/<slug>/`. The
//! manifest comes first so the entry file name is taken from it rather than
//! assumed; the display image is cosmetic and a missing one does not fail
//! the install.

use crate::error::{Error, Result};
use crate::library::InstalledProject;
use crate::manifest::{self, MANIFEST_FILE};
use crate::remote::DeployBackend;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Cosmetic cover image published alongside each game
pub const DISPLAY_IMAGE: &str = "displayimage.png";

/// Download the game `slug` from the remote into the library
///
/// Fails if the manifest or entry script cannot be fetched; a partially
/// written directory is left behind for a retry to overwrite.
pub fn install_game<B: DeployBackend>(
    backend: &B,
    games_root: &Path,
    slug: &str,
) -> Result<InstalledProject> {
    let project_dir = games_root.join(slug);
    fs::create_dir_all(&project_dir)?;

    let manifest_bytes = backend.download_asset(slug, MANIFEST_FILE)?;
    fs::write(project_dir.join(MANIFEST_FILE), &manifest_bytes)?;
    let project = manifest::read_manifest(&project_dir)?;

    let entry_bytes = backend.download_asset(slug, &project.entry)?;
    let entry_path = project_dir.join(&project.entry);
    if let Some(parent) = entry_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&entry_path, entry_bytes)?;

    match backend.download_asset(slug, DISPLAY_IMAGE) {
        Ok(bytes) => fs::write(project_dir.join(DISPLAY_IMAGE), bytes)?,
        Err(Error::AssetNotFound { .. }) => {
            warn!("'{}' has no display image, continuing", slug);
        }
        Err(e) => return Err(e),
    }

    info!("Installed '{}' v{}", project.name, project.version);
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{CatalogIndex, DeployHandshake};
    use std::collections::{BTreeMap, HashMap};
    use tempfile::TempDir;

    struct AssetBackend {
        assets: HashMap<(String, String), Vec<u8>>,
    }

    impl AssetBackend {
        fn new() -> Self {
            Self {
                assets: HashMap::new(),
            }
        }

        fn with_asset(mut self, slug: &str, file_name: &str, bytes: &[u8]) -> Self {
            self.assets
                .insert((slug.to_string(), file_name.to_string()), bytes.to_vec());
            self
        }
    }

    impl DeployBackend for AssetBackend {
        fn fetch_catalog(&self) -> CatalogIndex {
            CatalogIndex::default()
        }

        fn begin_deploy(&self, _files: &BTreeMap<String, String>) -> Result<DeployHandshake> {
            unimplemented!("install tests never deploy")
        }

        fn upload_file(&self, _deploy_id: &str, _remote_path: &str, _bytes: &[u8]) -> Result<()> {
            unimplemented!("install tests never upload")
        }

        fn download_asset(&self, slug: &str, file_name: &str) -> Result<Vec<u8>> {
            self.assets
                .get(&(slug.to_string(), file_name.to_string()))
                .cloned()
                .ok_or_else(|| Error::AssetNotFound {
                    slug: slug.to_string(),
                    file_name: file_name.to_string(),
                })
        }
    }

    #[test]
    fn test_install_fetches_manifest_entry_and_image() {
        let root = TempDir::new().unwrap();
        let backend = AssetBackend::new()
            .with_asset("alpha", MANIFEST_FILE, br#"{"name": "Alpha", "entry": "run.py"}"#)
            .with_asset("alpha", "run.py", b"print('alpha')")
            .with_asset("alpha", DISPLAY_IMAGE, b"\x89PNG");

        let project = install_game(&backend, root.path(), "alpha").unwrap();

        assert_eq!(project.name, "Alpha");
        let dir = root.path().join("alpha");
        assert_eq!(std::fs::read(dir.join("run.py")).unwrap(), b"print('alpha')");
        assert!(dir.join(DISPLAY_IMAGE).exists());
    }

    #[test]
    fn test_missing_image_is_tolerated() {
        let root = TempDir::new().unwrap();
        let backend = AssetBackend::new()
            .with_asset("alpha", MANIFEST_FILE, br#"{"name": "Alpha"}"#)
            .with_asset("alpha", "main.py", b"print('alpha')");

        assert!(install_game(&backend, root.path(), "alpha").is_ok());
        assert!(!root.path().join("alpha").join(DISPLAY_IMAGE).exists());
    }

    #[test]
    fn test_traversal_entry_never_written_outside_library() {
        let tmp = TempDir::new().unwrap();
        let games_root = tmp.path().join("outer").join("games");
        std::fs::create_dir_all(&games_root).unwrap();
        let backend = AssetBackend::new()
            .with_asset(
                "evil",
                MANIFEST_FILE,
                br#"{"name": "Evil", "entry": "../../escape.py"}"#,
            )
            .with_asset("evil", "../../escape.py", b"payload");

        let result = install_game(&backend, &games_root, "evil");

        assert!(matches!(result, Err(Error::ManifestMalformed { .. })));
        assert!(!games_root.join("escape.py").exists());
        assert!(!tmp.path().join("outer").join("escape.py").exists());
        assert!(!tmp.path().join("escape.py").exists());
    }

    #[test]
    fn test_missing_manifest_fails_install() {
        let root = TempDir::new().unwrap();
        let backend = AssetBackend::new().with_asset("alpha", "main.py", b"code");

        assert!(matches!(
            install_game(&backend, root.path(), "alpha"),
            Err(Error::AssetNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_entry_script_fails_install() {
        let root = TempDir::new().unwrap();
        let backend =
            AssetBackend::new().with_asset("alpha", MANIFEST_FILE, br#"{"name": "Alpha"}"#);

        assert!(matches!(
            install_game(&backend, root.path(), "alpha"),
            Err(Error::AssetNotFound { .. })
        ));
    }
}
