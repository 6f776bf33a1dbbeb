// src/deploy.rs

//! Content-addressed publishing
//!
//! A publish is a linear sequence with abort points:
//!
//! 1. **Merge catalog** — fetch the remote index and append the publishing
//!    slug if absent. The merged index is itself part of the deploy, hashed
//!    under `/games.json` like any other file, so "is this game visible" is
//!    exactly "did its slug reach the uploaded index".
//! 2. **Index tree** — hash the *entire* games root, not just the new
//!    project. The backend replaces its active file set with each deploy;
//!    omitting previously published files would delete them. Every publish is
//!    a full resynchronization: after it succeeds, the remote file set equals
//!    the local one.
//! 3. **Handshake** — open the deploy and learn which hashes the backend is
//!    missing. Nothing remote has mutated before this point, so any earlier
//!    failure aborts cleanly.
//! 4. **Selective upload** — send only content the backend asked for.
//!    Per-file failures are logged and reported, never rolled back.
//!
//! The result is best-effort, not transactional: a report with failures means
//! the deploy may reference files that never arrived. Concurrent publishers
//! can also overwrite each other's catalog merge; there is no lease or
//! compare-and-swap on the index.

use crate::error::Result;
use crate::hash::{self, DeployManifest};
use crate::manifest;
use crate::remote::{CatalogIndex, DeployBackend, CATALOG_REMOTE_PATH};
use std::path::Path;
use tracing::{debug, info, warn};

/// Remote directory prefix the games root maps onto
const REMOTE_PREFIX: &str = "games";

/// One file that failed to upload during a publish
#[derive(Debug, Clone)]
pub struct UploadFailure {
    pub remote_path: String,
    pub reason: String,
}

/// Outcome of a publish whose handshake succeeded
///
/// `failed` being non-empty means the deploy is incomplete on the backend;
/// callers that need certainty must re-verify, this module does not.
#[derive(Debug)]
pub struct PublishReport {
    pub deploy_id: String,
    pub total_files: usize,
    pub uploaded: usize,
    pub skipped: usize,
    pub failed: Vec<UploadFailure>,
}

impl PublishReport {
    /// Whether every required file reached the backend
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Merge the publishing slug into the remote catalog's working copy
fn merge_catalog<B: DeployBackend>(backend: &B, slug: &str) -> CatalogIndex {
    let mut catalog = backend.fetch_catalog();
    if catalog.insert(slug) {
        debug!("Appended '{}' to catalog ({} slugs)", slug, catalog.games.len());
    } else {
        debug!("Catalog already lists '{}'", slug);
    }
    catalog
}

/// Build the deploy manifest: full games tree plus the merged catalog index
fn build_manifest(games_root: &Path, catalog: &CatalogIndex) -> Result<DeployManifest> {
    let mut deploy_manifest = hash::index_tree(games_root, REMOTE_PREFIX)?;
    deploy_manifest.insert_inline(CATALOG_REMOTE_PATH.to_string(), catalog.to_bytes()?);
    Ok(deploy_manifest)
}

/// Publish the project `slug` from `games_root` to the deploy backend
///
/// The project must be an immediate subdirectory of `games_root` with a
/// readable manifest. Returns a [`PublishReport`] when the handshake
/// succeeded, even if some uploads failed; aborts with an error on anything
/// before or during the handshake.
pub fn publish<B: DeployBackend>(
    backend: &B,
    games_root: &Path,
    slug: &str,
) -> Result<PublishReport> {
    backend.preflight()?;
    manifest::read_manifest(&games_root.join(slug))?;

    let catalog = merge_catalog(backend, slug);
    let deploy_manifest = build_manifest(games_root, &catalog)?;
    info!(
        "Publishing '{}': {} files in deploy manifest",
        slug,
        deploy_manifest.len()
    );

    let handshake = backend.begin_deploy(&deploy_manifest.hashes())?;

    let mut report = PublishReport {
        deploy_id: handshake.deploy_id.clone(),
        total_files: deploy_manifest.len(),
        uploaded: 0,
        skipped: 0,
        failed: Vec::new(),
    };

    for (remote_path, entry) in deploy_manifest.iter() {
        if !handshake.required.contains(&entry.hash) {
            report.skipped += 1;
            continue;
        }

        let outcome = entry
            .read_content()
            .map_err(crate::error::Error::from)
            .and_then(|bytes| backend.upload_file(&handshake.deploy_id, remote_path, &bytes));

        match outcome {
            Ok(()) => report.uploaded += 1,
            Err(e) => {
                warn!("Upload of '{}' failed: {}", remote_path, e);
                report.failed.push(UploadFailure {
                    remote_path: remote_path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if report.is_complete() {
        info!(
            "Publish of '{}' complete: {} uploaded, {} already on backend",
            slug, report.uploaded, report.skipped
        );
    } else {
        warn!(
            "Publish of '{}' incomplete: {} of {} required uploads failed",
            slug,
            report.failed.len(),
            report.uploaded + report.failed.len()
        );
    }
    Ok(report)
}
