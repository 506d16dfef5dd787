// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request descriptors, GET/POST selection and the HTTP transport seam

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::params::SearchParams;
use super::types::{HeaderList, HttpMethod, Result, SearchError, TransportError};
use super::uri::resolve_url;
use crate::version;

/// Longest URL, in characters, still sent as a GET
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 3500;

/// Default transport timeout in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// A fully-resolved request, built fresh for every call
///
/// For GET and HEAD the parameters are already on `url`; for POST they are in
/// `body` and `url` has no query string.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute request URL
    pub url: Url,
    /// Headers in send order
    pub headers: HeaderList,
    /// Form-encoded body (POST only)
    pub body: Option<String>,
    /// Canonical parameters the request was built from
    pub params: SearchParams,
    /// Per-request timeout override
    pub timeout: Option<Duration>,
}

impl RequestDescriptor {
    /// Build a request carrying `params` the way `method` requires
    pub fn build(
        method: HttpMethod,
        base_url: &Url,
        resource_path: &str,
        params: SearchParams,
    ) -> Result<Self> {
        let (url, body, headers) = if method.carries_body() {
            let url = resolve_url(base_url, resource_path, None)?;
            let headers = vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())];
            (url, Some(params.to_form_encoded()), headers)
        } else {
            (resolve_url(base_url, resource_path, Some(&params))?, None, Vec::new())
        };

        Ok(Self {
            method,
            url,
            headers,
            body,
            params,
            timeout: None,
        })
    }

    /// Path plus `?query` when a query string is present
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    /// First value of a header, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing an existing one with the same name
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((name, value)),
        }
    }
}

/// Raw response handed back by the transport
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl RawResponse {
    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Decides between GET and POST from the encoded URL length
#[derive(Debug, Clone, Copy)]
pub struct TransportSelector {
    max_length: usize,
}

impl TransportSelector {
    /// Selector with the given maximum URL length
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Configured maximum URL length
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Whether a candidate URL is short enough for a GET
    pub fn fits(&self, url: &Url) -> bool {
        url.as_str().len() <= self.max_length
    }

    /// GET when `params` fit on the URL, otherwise POST
    pub fn select_method(
        &self,
        base_url: &Url,
        resource_path: &str,
        params: &SearchParams,
    ) -> Result<HttpMethod> {
        let candidate = resolve_url(base_url, resource_path, Some(params))?;
        Ok(if self.fits(&candidate) {
            HttpMethod::Get
        } else {
            HttpMethod::Post
        })
    }
}

impl Default for TransportSelector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_QUERY_LENGTH)
    }
}

/// True iff the absolute URL with `params` in its query string is at most
/// `max_length` characters
pub fn should_use_get(
    base_url: &Url,
    resource_path: &str,
    params: &SearchParams,
    max_length: usize,
) -> Result<bool> {
    TransportSelector::new(max_length)
        .select_method(base_url, resource_path, params)
        .map(|method| method == HttpMethod::Get)
}

/// Sends a finished request and returns the raw response
///
/// Implementations must transmit `url`, `body` and `headers` exactly as given;
/// the signature attached to the request covers those bytes.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request
    async fn send(&self, request: RequestDescriptor) -> std::result::Result<RawResponse, TransportError>;

    /// Transport name for logging
    fn name(&self) -> &'static str {
        "http"
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`
pub(crate) fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// [`HttpTransport`] backed by a pooled `reqwest` client
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport with the given default timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(version::user_agent())
            .build()
            .map_err(|e| SearchError::configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn map_error(&self, err: reqwest::Error, timeout: Duration) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                timeout_ms: duration_millis(timeout),
            }
        } else {
            TransportError::Network {
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: RequestDescriptor) -> std::result::Result<RawResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Head => reqwest::Method::HEAD,
        };
        let timeout = request.timeout.unwrap_or(self.timeout);

        let mut builder = self.client.request(method, request.url).timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_error(e, timeout))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_error(e, timeout))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}
