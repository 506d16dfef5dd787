// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client for a Solr-compatible search service behind an HMAC authentication gateway
//!
//! ```rust,no_run
//! use signed_solr_client::{SearchClient, SearchClientConfig, SearchParams};
//!
//! # async fn example() -> signed_solr_client::Result<()> {
//! let client = SearchClient::new(SearchClientConfig::new(
//!     "https://search.example.com",
//!     "ABCD-12345",
//!     "derived-key",
//! ))?;
//!
//! let results = client.select("hello world").await?;
//! let filtered = client
//!     .select(SearchParams::new().with("q", "rust").with("fq", "type:article"))
//!     .await?;
//! client.ping().await?;
//! # let _ = (results, filtered);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod search;
pub mod version;

pub use auth::{
    DerivedKey, Nonce, NonceSource, RandomNoncer, RequestSignature, RequestSigner,
    SearchAuthPlugin, SignatureAlgorithm, SignedRequest, TenantCredential,
};
pub use search::{
    HttpMethod, HttpTransport, QueryInput, RequestDescriptor, RequestInterceptor,
    RequestOptions, Result, SearchClient, SearchClientConfig, SearchError, SearchParams,
    SearchResult, TransportError,
};
