// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the search client

use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

use super::transport::{DEFAULT_MAX_QUERY_LENGTH, DEFAULT_REQUEST_TIMEOUT_MS};
use super::types::{Result, SearchError};
use super::uri::default_base_path;
use crate::auth::SignatureAlgorithm;

fn default_max_query_length() -> usize {
    DEFAULT_MAX_QUERY_LENGTH
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Unreserved URL characters; anything else would be re-encoded or split off
/// the path when the request URL is resolved
fn is_path_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

/// Construction-time configuration for a [`SearchClient`](super::SearchClient)
#[derive(Clone, Deserialize)]
pub struct SearchClientConfig {
    /// Scheme and host of the search service, e.g. `https://search.example.com`
    pub base_url: String,
    /// Index identifier
    pub index_id: String,
    /// Derived key for the index
    pub derived_key: String,
    /// Path prefix of the index; `/solr/{index_id}` when unset
    #[serde(default)]
    pub base_path: Option<String>,
    /// Longest URL still sent as a GET
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
    /// Transport timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// MAC used for request signatures
    #[serde(default)]
    pub signature_algorithm: SignatureAlgorithm,
}

impl SearchClientConfig {
    /// Configuration with the three required values and defaults for the rest
    pub fn new(
        base_url: impl Into<String>,
        index_id: impl Into<String>,
        derived_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            index_id: index_id.into(),
            derived_key: derived_key.into(),
            base_path: None,
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            signature_algorithm: SignatureAlgorithm::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Missing required variables are left empty and reported by
    /// [`validate`](Self::validate).
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(
            env::var("SEARCH_BASE_URL").unwrap_or_default(),
            env::var("SEARCH_INDEX_ID").unwrap_or_default(),
            env::var("SEARCH_DERIVED_KEY").unwrap_or_default(),
        );

        config.base_path = env::var("SEARCH_BASE_PATH").ok().filter(|v| !v.is_empty());
        config.max_query_length = env::var("SEARCH_MAX_QUERY_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_QUERY_LENGTH);
        config.request_timeout_ms = env::var("SEARCH_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);
        if let Ok(algorithm) = env::var("SEARCH_SIGNATURE_ALGORITHM") {
            config.signature_algorithm = algorithm.parse()?;
        }

        Ok(config)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SearchError::configuration(format!("invalid TOML config: {}", e)))
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SearchError::configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Check that every required value is present and usable
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(SearchError::configuration("base_url is required"));
        }
        if self.index_id.trim().is_empty() {
            return Err(SearchError::configuration("index_id is required"));
        }
        if self.derived_key.is_empty() {
            return Err(SearchError::configuration("derived_key is required"));
        }
        if !self.index_id.chars().all(is_path_safe) {
            return Err(SearchError::configuration(format!(
                "index_id may only contain letters, digits, '-', '.', '_' or '~', got '{}'",
                self.index_id
            )));
        }
        self.parsed_base_url()?;
        if let Some(base_path) = &self.base_path {
            if !base_path.starts_with('/') {
                return Err(SearchError::configuration(format!(
                    "base_path must start with '/', got '{}'",
                    base_path
                )));
            }
            if !base_path.chars().all(|c| c == '/' || is_path_safe(c)) {
                return Err(SearchError::configuration(format!(
                    "base_path may only contain '/' and unreserved characters, got '{}'",
                    base_path
                )));
            }
        }
        if self.max_query_length == 0 {
            return Err(SearchError::configuration(
                "max_query_length must be greater than 0",
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(SearchError::configuration(
                "request_timeout_ms must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Base URL as a parsed [`Url`]
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim()).map_err(|e| {
            SearchError::configuration(format!("invalid base_url '{}': {}", self.base_url, e))
        })?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(SearchError::configuration(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(url)
    }

    /// Configured base path, or `/solr/{index_id}`
    pub fn resolved_base_path(&self) -> String {
        match &self.base_path {
            Some(path) => path.trim_end_matches('/').to_string(),
            None => default_base_path(&self.index_id),
        }
    }

    /// Transport timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl fmt::Debug for SearchClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchClientConfig")
            .field("base_url", &self.base_url)
            .field("index_id", &self.index_id)
            .field("derived_key", &"<redacted>")
            .field("base_path", &self.base_path)
            .field("max_query_length", &self.max_query_length)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}
