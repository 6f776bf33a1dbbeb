// src/remote/client.rs

//! Blocking HTTP implementation of the deploy backend
//!
//! Thin wrapper around reqwest. Catalog fetches degrade to an empty index on
//! any failure; deploy operations surface typed errors so the publish
//! pipeline can distinguish a rejected handshake from a dead network.

use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::remote::{CatalogIndex, DeployBackend, DeployHandshake, CATALOG_FILE};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timeout for catalog and asset requests (15 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for deploy API requests; uploads can carry whole game trees
const DEPLOY_TIMEOUT: Duration = Duration::from_secs(120);

/// Wire shapes the catalog endpoint has been seen to return
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogWire {
    Indexed { games: Vec<String> },
    Bare(Vec<String>),
}

/// HTTP client for the remote catalog and deploy API
pub struct RemoteCatalogClient {
    client: Client,
    config: RemoteConfig,
}

impl RemoteCatalogClient {
    /// Create a client for the configured remote
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEPLOY_TIMEOUT)
            .build()
            .map_err(|e| Error::NetworkUnavailable(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn catalog_url(&self) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), CATALOG_FILE)
    }
}

impl DeployBackend for RemoteCatalogClient {
    fn preflight(&self) -> Result<()> {
        self.config.credentials().map(|_| ())
    }

    fn fetch_catalog(&self) -> CatalogIndex {
        let url = self.catalog_url();
        debug!("Fetching catalog from {}", url);

        let response = match self.client.get(&url).timeout(HTTP_TIMEOUT).send() {
            Ok(r) => r,
            Err(e) => {
                warn!("Catalog fetch failed: {}", e);
                return CatalogIndex::default();
            }
        };

        if response.status() != StatusCode::OK {
            warn!("Catalog fetch returned HTTP {}", response.status());
            return CatalogIndex::default();
        }

        match response.json::<CatalogWire>() {
            Ok(CatalogWire::Indexed { games }) => CatalogIndex { games },
            Ok(CatalogWire::Bare(games)) => CatalogIndex { games },
            Err(e) => {
                warn!("Catalog response was not valid JSON: {}", e);
                CatalogIndex::default()
            }
        }
    }

    fn begin_deploy(&self, files: &BTreeMap<String, String>) -> Result<DeployHandshake> {
        let (token, site_id) = self.config.credentials()?;
        let url = format!(
            "{}/sites/{}/deploys",
            self.config.api_url.trim_end_matches('/'),
            site_id
        );
        info!("Opening deploy for {} files", files.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "files": files }))
            .send()
            .map_err(|e| Error::NetworkUnavailable(format!("Deploy handshake failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(Error::HandshakeRejected(format!("HTTP {status} from {url}")));
        }

        let handshake: DeployHandshake = response
            .json()
            .map_err(|e| Error::HandshakeRejected(format!("Unparseable handshake response: {e}")))?;

        info!(
            "Deploy {} opened, {} hashes required",
            handshake.deploy_id,
            handshake.required.len()
        );
        Ok(handshake)
    }

    fn upload_file(&self, deploy_id: &str, remote_path: &str, bytes: &[u8]) -> Result<()> {
        let (token, _) = self.config.credentials()?;
        let url = format!(
            "{}/deploys/{}/files{}",
            self.config.api_url.trim_end_matches('/'),
            deploy_id,
            remote_path
        );
        debug!("Uploading {} ({} bytes)", remote_path, bytes.len());

        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .header("Content-Type", "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .map_err(|e| Error::NetworkUnavailable(format!("Upload of '{remote_path}' failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::NetworkUnavailable(format!(
                "HTTP {} uploading '{}'",
                response.status(),
                remote_path
            )));
        }
        Ok(())
    }

    fn download_asset(&self, slug: &str, file_name: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/games/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            slug,
            file_name
        );
        debug!("Downloading asset {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(HTTP_TIMEOUT)
            .send()
            .map_err(|e| Error::NetworkUnavailable(format!("Download of '{file_name}' failed: {e}")))?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response.bytes().map_err(|e| {
                    Error::NetworkUnavailable(format!("Failed to read '{file_name}': {e}"))
                })?;
                Ok(bytes.to_vec())
            }
            StatusCode::NOT_FOUND => Err(Error::AssetNotFound {
                slug: slug.to_string(),
                file_name: file_name.to_string(),
            }),
            status => Err(Error::NetworkUnavailable(format!(
                "HTTP {status} from {url}"
            ))),
        }
    }
}
