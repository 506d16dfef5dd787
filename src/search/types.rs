// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types shared by the search client

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Decoded response body. No schema is enforced at this layer.
pub type SearchResult = serde_json::Value;

/// Extra request headers, in the order they should be sent
pub type HeaderList = Vec<(String, String)>;

/// HTTP methods the client issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Parameters ride in the query string
    Get,
    /// Parameters ride in a form-encoded body
    Post,
    /// Query-bearing probe with no response body
    Head,
}

impl HttpMethod {
    /// Upper-case method name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Whether request parameters travel in the body rather than the URL
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request options passed through to the transport
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Overrides the transport's default timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Options with a request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Errors that can occur while building, signing, sending or decoding a request
#[derive(Debug, Error)]
pub enum SearchError {
    /// Required configuration is missing or invalid
    #[error("Configuration error: {reason}")]
    Configuration {
        /// What is missing or wrong
        reason: String,
    },

    /// The request could not be signed and was not sent
    #[error("Signing failed: {reason}")]
    Signing {
        /// Why signing failed
        reason: String,
    },

    /// Network or HTTP failure reported by the transport
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response body is not valid JSON
    #[error("Failed to decode response: {reason}")]
    Decode {
        /// Decoder error message
        reason: String,
    },
}

impl SearchError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        SearchError::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn signing(reason: impl Into<String>) -> Self {
        SearchError::Signing {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Decode {
            reason: err.to_string(),
        }
    }
}

/// Failures surfaced by an [`HttpTransport`](super::transport::HttpTransport)
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS or TLS failure
    #[error("Network error: {message}")]
    Network {
        /// Underlying error message
        message: String,
    },

    /// The request did not complete in time
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// The server answered with a non-success status
    #[error("Search API error: {status} - {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body as text
        body: String,
    },
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, SearchError>;
