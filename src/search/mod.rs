// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Signed search client
//!
//! Issues `select` and `ping` requests against a tenant-scoped Solr index
//! behind an HMAC authentication gateway.
//!
//! Key features:
//! - Canonical parameter normalization shared by measurement, signing and transmission
//! - GET/POST selection from the encoded URL length
//! - Automatic request signing through the interceptor seam
//! - Pluggable HTTP transport (reqwest by default)

pub mod client;
pub mod config;
pub mod interceptor;
pub mod params;
pub mod transport;
pub mod types;
pub mod uri;

// Re-export commonly used types
pub use client::SearchClient;
pub use config::SearchClientConfig;
pub use interceptor::{RequestInterceptor, StaticHeaders};
pub use params::{normalize_ping, normalize_select, QueryInput, SearchParams};
pub use transport::{
    should_use_get, HttpTransport, RawResponse, RequestDescriptor, ReqwestTransport,
    TransportSelector, DEFAULT_MAX_QUERY_LENGTH,
};
pub use types::{
    HeaderList, HttpMethod, RequestOptions, Result, SearchError, SearchResult, TransportError,
};
