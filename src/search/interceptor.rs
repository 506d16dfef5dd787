// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request interceptor trait definition

use super::transport::RequestDescriptor;
use super::types::Result;

/// Hook run on every outgoing request between building and transmission
///
/// Interceptors see the final URL, headers and body. Returning an error aborts
/// the request before anything is sent.
pub trait RequestInterceptor: Send + Sync {
    /// Inspect or modify the request
    fn before_send(&self, request: &mut RequestDescriptor) -> Result<()>;

    /// Interceptor name for logging
    fn name(&self) -> &'static str;
}

/// Adds fixed headers to every request
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders {
    headers: Vec<(String, String)>,
}

impl StaticHeaders {
    /// Interceptor adding `headers`
    pub fn new(headers: Vec<(String, String)>) -> Self {
        Self { headers }
    }
}

impl RequestInterceptor for StaticHeaders {
    fn before_send(&self, request: &mut RequestDescriptor) -> Result<()> {
        for (name, value) in &self.headers {
            request.set_header(name.clone(), value.clone());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "static-headers"
    }
}
