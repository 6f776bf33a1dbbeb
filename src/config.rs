// src/config.rs

//! Remote endpoint and credential configuration
//!
//! The platform talks to two hosts: the public site that serves the catalog
//! and game assets, and the deploy API that accepts content-addressed
//! publishes. Credentials come from the environment and are only required at
//! publish time; browsing and launching work without them.

use crate::error::{Error, Result};
use std::env;

/// Public site serving `games.json` and game assets
pub const DEFAULT_SITE_URL: &str = "https://gamedock-games.netlify.app";

/// Deploy API root
pub const DEFAULT_API_URL: &str = "https://api.netlify.com/api/v1";

/// Default local library directory
pub const DEFAULT_GAMES_DIR: &str = "games";

/// Environment variable holding the deploy auth token
pub const AUTH_TOKEN_VAR: &str = "GAMEDOCK_AUTH_TOKEN";

/// Environment variable holding the deploy site id
pub const SITE_ID_VAR: &str = "GAMEDOCK_SITE_ID";

/// Remote endpoints plus optional publish credentials
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_url: String,
    pub auth_token: Option<String>,
    pub site_id: Option<String>,
}

impl RemoteConfig {
    /// Build configuration from the environment
    ///
    /// `GAMEDOCK_SITE_URL` and `GAMEDOCK_API_URL` override the built-in
    /// endpoints; absent credentials are not an error here.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("GAMEDOCK_SITE_URL")
                .unwrap_or_else(|_| DEFAULT_SITE_URL.to_string()),
            api_url: env::var("GAMEDOCK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            auth_token: env::var(AUTH_TOKEN_VAR).ok().filter(|v| !v.is_empty()),
            site_id: env::var(SITE_ID_VAR).ok().filter(|v| !v.is_empty()),
        }
    }

    /// The credentials a publish requires, or which one is missing
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let token = self
            .auth_token
            .as_deref()
            .ok_or(Error::CredentialsMissing(AUTH_TOKEN_VAR))?;
        let site_id = self
            .site_id
            .as_deref()
            .ok_or(Error::CredentialsMissing(SITE_ID_VAR))?;
        Ok((token, site_id))
    }
}
