// src/remote/mod.rs

//! Remote catalog and deploy backend
//!
//! The remote side is a static site plus a content-addressed deploy API. The
//! catalog index (`games.json`) lists published slugs; a deploy handshake
//! sends a `path -> hash` map and learns which hashes the backend still
//! needs. [`DeployBackend`] is the seam between the publish pipeline and the
//! HTTP transport, so the pipeline can be driven against a mock in tests.

mod client;

pub use client::RemoteCatalogClient;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Remote file name of the catalog index
pub const CATALOG_FILE: &str = "games.json";

/// Remote path of the catalog index within a deploy
pub const CATALOG_REMOTE_PATH: &str = "/games.json";

/// Catalog file stem; a slug equal to it is an artifact, not a game
const CATALOG_STEM: &str = "games";

/// The remote catalog index: the set of published slugs
///
/// Owned by the backend. A publish holds a working copy only long enough to
/// merge its own slug in and upload the result; there is no transaction, so
/// concurrent publishers can race (documented limitation).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogIndex {
    pub games: Vec<String>,
}

impl CatalogIndex {
    pub fn contains(&self, slug: &str) -> bool {
        self.games.iter().any(|g| g == slug)
    }

    /// Append `slug` if absent; returns whether the index changed
    pub fn insert(&mut self, slug: &str) -> bool {
        if self.contains(slug) {
            false
        } else {
            self.games.push(slug.to_string());
            true
        }
    }

    /// Serialize to the wire bytes uploaded as `games.json`
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// A catalog entry prepared for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub id: String,
    pub display_name: String,
}

/// Title-case an underscored slug: `dungeon_crawler` -> `Dungeon Crawler`
fn display_name(slug: &str) -> String {
    slug.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive the displayable store listing from a catalog index
///
/// Excludes any slug equal to the catalog file stem, which some backends echo
/// back as if it were a game.
pub fn store_entries(catalog: &CatalogIndex) -> Vec<StoreEntry> {
    catalog
        .games
        .iter()
        .filter(|slug| !slug.eq_ignore_ascii_case(CATALOG_STEM))
        .map(|slug| StoreEntry {
            id: slug.clone(),
            display_name: display_name(slug),
        })
        .collect()
}

/// Response of a successful deploy handshake
#[derive(Debug, Clone, Deserialize)]
pub struct DeployHandshake {
    /// Backend-assigned id addressing subsequent uploads
    #[serde(rename = "id")]
    pub deploy_id: String,
    /// Hashes the backend does not already hold and must receive
    #[serde(default)]
    pub required: HashSet<String>,
}

/// The deploy backend capability the publish pipeline depends on
///
/// Implemented over HTTP by [`RemoteCatalogClient`]; tests substitute a
/// recording mock.
pub trait DeployBackend {
    /// Verify the backend could accept a deploy before any work begins
    ///
    /// A publish aborts here on missing credentials, before any remote call.
    fn preflight(&self) -> Result<()> {
        Ok(())
    }

    /// Fetch the catalog index
    ///
    /// Catalog listing is advisory: any network failure or non-200 response
    /// yields an empty index rather than an error, so a publish can still
    /// proceed and a store listing degrades to empty.
    fn fetch_catalog(&self) -> CatalogIndex;

    /// Open a deploy for the given `path -> hash` map
    fn begin_deploy(&self, files: &BTreeMap<String, String>) -> Result<DeployHandshake>;

    /// Upload one file's bytes into an open deploy
    ///
    /// Idempotent: retrying a path is safe, and a failed upload leaves other
    /// files untouched.
    fn upload_file(&self, deploy_id: &str, remote_path: &str, bytes: &[u8]) -> Result<()>;

    /// Download a published asset; `AssetNotFound` on 404
    fn download_asset(&self, slug: &str, file_name: &str) -> Result<Vec<u8>>;

    /// The store listing derived from the current catalog
    fn fetch_games(&self) -> Vec<StoreEntry> {
        store_entries(&self.fetch_catalog())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_insert_appends_once() {
        let mut catalog = CatalogIndex {
            games: vec!["beta".to_string()],
        };

        assert!(catalog.insert("gamma"));
        assert!(!catalog.insert("gamma"));
        assert_eq!(catalog.games, vec!["beta", "gamma"]);
    }

    #[test]
    fn test_catalog_wire_bytes() {
        let catalog = CatalogIndex {
            games: vec!["beta".to_string(), "gamma".to_string()],
        };

        assert_eq!(
            catalog.to_bytes().unwrap(),
            br#"{"games":["beta","gamma"]}"#
        );
    }

    #[test]
    fn test_display_name_title_cases_underscores() {
        assert_eq!(display_name("dungeon_crawler"), "Dungeon Crawler");
        assert_eq!(display_name("solo"), "Solo");
    }

    #[test]
    fn test_store_entries_exclude_catalog_stem() {
        let catalog = CatalogIndex {
            games: vec!["games".to_string(), "alpha".to_string()],
        };

        let entries = store_entries(&catalog);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "alpha");
        assert_eq!(entries[0].display_name, "Alpha");
    }

    #[test]
    fn test_handshake_wire_shape() {
        let handshake: DeployHandshake =
            serde_json::from_str(r#"{"id": "dep-1", "required": ["abc", "def"]}"#).unwrap();

        assert_eq!(handshake.deploy_id, "dep-1");
        assert!(handshake.required.contains("abc"));
        assert_eq!(handshake.required.len(), 2);
    }

    #[test]
    fn test_handshake_missing_required_defaults_empty() {
        let handshake: DeployHandshake = serde_json::from_str(r#"{"id": "dep-2"}"#).unwrap();
        assert!(handshake.required.is_empty());
    }
}
