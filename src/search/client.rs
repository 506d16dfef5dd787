// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search client orchestration
//!
//! Coordinates parameter normalization, transport selection, request signing
//! and decoding for the `select` and `ping` handlers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use super::config::SearchClientConfig;
use super::interceptor::RequestInterceptor;
use super::params::{normalize_ping, normalize_select, QueryInput, SearchParams};
use super::transport::{
    duration_millis, HttpTransport, RawResponse, RequestDescriptor, ReqwestTransport,
    TransportSelector,
};
use super::types::{
    HeaderList, HttpMethod, RequestOptions, Result, SearchError, SearchResult, TransportError,
};
use super::uri::{expand_template, PING_TEMPLATE, SELECT_TEMPLATE};
use crate::auth::{RandomNoncer, RequestSigner, SearchAuthPlugin, TenantCredential};
use crate::version;

/// Client for one tenant-scoped search index
///
/// Cheap to share behind an `Arc`; every call builds, signs and sends its own
/// request.
pub struct SearchClient {
    transport: Arc<dyn HttpTransport>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    auth: SearchAuthPlugin,
    base_url: Url,
    base_path: String,
    index_id: String,
    max_query_length: AtomicUsize,
}

impl SearchClient {
    /// Create a client backed by the reqwest transport
    ///
    /// Fails with [`SearchError::Configuration`] if a required value is missing.
    pub fn new(config: SearchClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends through `transport`
    pub fn with_transport(
        config: SearchClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        config.validate()?;

        let base_url = config.parsed_base_url()?;
        let base_path = config.resolved_base_path();
        let credential = TenantCredential::new(config.index_id.clone(), config.derived_key);
        let auth = SearchAuthPlugin::new(
            credential,
            RequestSigner::new(config.signature_algorithm),
            Arc::new(RandomNoncer::new()),
        );

        info!(
            "{} configured: base_url={}, base_path={}, transport={}",
            version::get_version_string(),
            base_url,
            base_path,
            transport.name()
        );

        Ok(Self {
            transport,
            interceptors: Vec::new(),
            auth,
            base_url,
            base_path,
            index_id: config.index_id,
            max_query_length: AtomicUsize::new(config.max_query_length),
        })
    }

    /// Register an interceptor
    ///
    /// Interceptors run in registration order, before the signing plugin, so
    /// the signature covers whatever they change.
    pub fn add_interceptor(&mut self, interceptor: Arc<dyn RequestInterceptor>) -> &mut Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Replace the signing plugin, e.g. to supply a custom nonce source
    pub fn set_auth_plugin(&mut self, plugin: SearchAuthPlugin) -> &mut Self {
        self.auth = plugin;
        self
    }

    /// Longest URL still sent as a GET
    pub fn max_query_length(&self) -> usize {
        self.max_query_length.load(Ordering::Relaxed)
    }

    /// Change the GET/POST threshold; applies to requests built afterwards
    pub fn set_max_query_length(&self, length: usize) -> &Self {
        self.max_query_length.store(length, Ordering::Relaxed);
        self
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Path prefix of the index
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Index identifier
    pub fn index_id(&self) -> &str {
        &self.index_id
    }

    /// Run a select query with default headers and options
    pub async fn select(&self, input: impl Into<QueryInput>) -> Result<SearchResult> {
        self.select_with(input, None, RequestOptions::default())
            .await
    }

    /// Run a select query
    ///
    /// Sent as a GET when the full URL fits within
    /// [`max_query_length`](Self::max_query_length), otherwise as a POST with
    /// the same parameters in a form body.
    pub async fn select_with(
        &self,
        input: impl Into<QueryInput>,
        headers: Option<HeaderList>,
        options: RequestOptions,
    ) -> Result<SearchResult> {
        let params = normalize_select(input.into());
        let path = self.resource_path(SELECT_TEMPLATE)?;

        let selector = TransportSelector::new(self.max_query_length());
        let method = selector.select_method(&self.base_url, &path, &params)?;

        let request = RequestDescriptor::build(method, &self.base_url, &path, params)?;
        let response = self.dispatch(request, headers, options).await?;
        decode(&response, false)
    }

    /// Run several select queries concurrently
    ///
    /// Results are returned in input order; one failure does not affect the others.
    pub async fn select_many<I, Q>(&self, inputs: I) -> Vec<Result<SearchResult>>
    where
        I: IntoIterator<Item = Q>,
        Q: Into<QueryInput>,
    {
        let futures: Vec<_> = inputs
            .into_iter()
            .map(|input| self.select(input))
            .collect();

        futures::future::join_all(futures).await
    }

    /// Probe the index with default parameters
    pub async fn ping(&self) -> Result<SearchResult> {
        self.ping_with(SearchParams::new(), None, RequestOptions::default())
            .await
    }

    /// Probe the index
    ///
    /// Always a HEAD request with the parameters in the query string. HEAD
    /// responses carry no body, so a successful ping yields `Value::Null`; a
    /// body, if one is returned, must be valid JSON.
    pub async fn ping_with(
        &self,
        params: SearchParams,
        headers: Option<HeaderList>,
        options: RequestOptions,
    ) -> Result<SearchResult> {
        let params = normalize_ping(params);
        let path = self.resource_path(PING_TEMPLATE)?;

        let request = RequestDescriptor::build(HttpMethod::Head, &self.base_url, &path, params)?;
        let response = self.dispatch(request, headers, options).await?;
        decode(&response, true)
    }

    fn resource_path(&self, template: &str) -> Result<String> {
        expand_template(template, &[("base_path", self.base_path.as_str())])
    }

    async fn dispatch(
        &self,
        mut request: RequestDescriptor,
        headers: Option<HeaderList>,
        options: RequestOptions,
    ) -> Result<RawResponse> {
        for (name, value) in headers.unwrap_or_default() {
            request.set_header(name, value);
        }
        request.timeout = options.timeout;

        for interceptor in &self.interceptors {
            interceptor.before_send(&mut request)?;
        }
        self.auth.before_send(&mut request)?;

        let method = request.method;
        let path = request.url.path().to_string();
        debug!(
            "Sending {} {} (url length {}, body {} bytes)",
            method,
            path,
            request.url.as_str().len(),
            request.body.as_ref().map_or(0, |b| b.len())
        );

        let start = Instant::now();
        let response = self.transport.send(request).await.map_err(|e| {
            warn!("Search request {} {} failed: {}", method, path, e);
            SearchError::Transport(e)
        })?;
        let elapsed_ms = duration_millis(start.elapsed());

        if !response.is_success() {
            warn!(
                "Search request {} {} returned status {} in {}ms",
                method, path, response.status, elapsed_ms
            );
            return Err(TransportError::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            }
            .into());
        }

        debug!(
            "Search request {} {} complete: status {} in {}ms",
            method, path, response.status, elapsed_ms
        );
        Ok(response)
    }
}

fn decode(response: &RawResponse, allow_empty: bool) -> Result<SearchResult> {
    if allow_empty && response.body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(SearchResult::Null);
    }
    Ok(serde_json::from_slice(&response.body)?)
}
