// src/hash.rs

//! Content hashing and deploy-tree indexing
//!
//! The deploy backend identifies file content by SHA-1 digest: the handshake
//! sends a `path -> hash` map and the backend answers with the hashes it does
//! not already hold. SHA-1 is the backend's wire contract, so it is the only
//! algorithm here; it is used for deduplication, not security.

use crate::error::Result;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Buffer size for streaming file hashing (8 KB)
const HASH_BUFFER_SIZE: usize = 8192;

/// Compute the SHA-1 hex digest of a byte slice
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Compute the SHA-1 hex digest of data from a reader
pub fn hash_reader<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha1::new();
    let mut buffer = [0u8; HASH_BUFFER_SIZE];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Compute the SHA-1 hex digest of a file's bytes
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    hash_reader(&mut file)
}

/// Where the bytes for a deploy manifest entry come from
///
/// Most entries are backed by files on disk. The merged catalog index is
/// generated during publish and carried inline, so nothing scratch is ever
/// written to the local tree.
#[derive(Debug, Clone)]
pub enum EntrySource {
    /// A regular file in the local tree
    File(PathBuf),
    /// Bytes generated in memory during publish
    Inline(Vec<u8>),
}

/// One entry of a [`DeployManifest`]: content hash plus where to read the bytes
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    pub hash: String,
    pub source: EntrySource,
}

impl ManifestEntry {
    /// Read the entry's content for upload
    pub fn read_content(&self) -> io::Result<Vec<u8>> {
        match &self.source {
            EntrySource::File(path) => fs::read(path),
            EntrySource::Inline(bytes) => Ok(bytes.clone()),
        }
    }
}

/// Map from remote-relative path to content entry, built fresh for each publish
///
/// Remote paths always start with `/` and use forward-slash separators
/// regardless of the host platform; that format is the wire contract with the
/// deploy backend. `BTreeMap` keeps iteration deterministic.
#[derive(Debug, Clone, Default)]
pub struct DeployManifest {
    entries: BTreeMap<String, ManifestEntry>,
}

impl DeployManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file-backed entry, hashing its bytes
    pub fn insert_file(&mut self, remote_path: String, local_path: PathBuf) -> io::Result<()> {
        let hash = hash_file(&local_path)?;
        trace!("Indexed {} -> {}", remote_path, hash);
        self.entries.insert(
            remote_path,
            ManifestEntry {
                hash,
                source: EntrySource::File(local_path),
            },
        );
        Ok(())
    }

    /// Add an in-memory entry, hashing the given bytes
    pub fn insert_inline(&mut self, remote_path: String, bytes: Vec<u8>) {
        let hash = hash_bytes(&bytes);
        self.entries.insert(
            remote_path,
            ManifestEntry {
                hash,
                source: EntrySource::Inline(bytes),
            },
        );
    }

    /// The `path -> hash` map sent in the deploy handshake
    pub fn hashes(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(path, entry)| (path.clone(), entry.hash.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ManifestEntry)> {
        self.entries.iter()
    }

    pub fn get(&self, remote_path: &str) -> Option<&ManifestEntry> {
        self.entries.get(remote_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join a path's components with forward slashes (the wire separator)
fn wire_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Index every regular file under `root` into a [`DeployManifest`]
///
/// Each file is keyed by `/<remote_prefix>/<path-from-root>` (or
/// `/<path-from-root>` when the prefix is empty) with forward-slash
/// separators. Symlinks and non-regular files are skipped. Re-running on
/// unchanged content yields identical hashes.
pub fn index_tree(root: &Path, remote_prefix: &str) -> Result<DeployManifest> {
    let mut manifest = DeployManifest::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let remote_path = if remote_prefix.is_empty() {
            format!("/{}", wire_path(rel))
        } else {
            format!("/{}/{}", remote_prefix, wire_path(rel))
        };

        manifest.insert_file(remote_path, entry.path().to_path_buf())?;
    }

    debug!(
        "Indexed {} files under '{}'",
        manifest.len(),
        root.display()
    );
    Ok(manifest)
}
