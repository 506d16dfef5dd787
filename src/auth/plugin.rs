// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Signing interceptor installed on every client
//!
//! Each request gets its own nonce and timestamp at send time, so a request
//! rebuilt by a retrying caller is signed afresh rather than replayed.

use std::sync::Arc;
use tracing::debug;

use super::credential::TenantCredential;
use super::nonce::NonceSource;
use super::signer::{unix_timestamp, RequestSigner};
use crate::search::interceptor::RequestInterceptor;
use crate::search::transport::RequestDescriptor;
use crate::search::types::Result;

/// Signs every outgoing request with the tenant's derived key
pub struct SearchAuthPlugin {
    credential: TenantCredential,
    signer: RequestSigner,
    noncer: Arc<dyn NonceSource>,
}

impl SearchAuthPlugin {
    /// Create the plugin for one tenant
    pub fn new(
        credential: TenantCredential,
        signer: RequestSigner,
        noncer: Arc<dyn NonceSource>,
    ) -> Self {
        Self {
            credential,
            signer,
            noncer,
        }
    }

    /// Index the plugin signs for
    pub fn index_id(&self) -> &str {
        self.credential.index_id()
    }
}

impl RequestInterceptor for SearchAuthPlugin {
    fn before_send(&self, request: &mut RequestDescriptor) -> Result<()> {
        let timestamp = unix_timestamp()?;
        let nonce = self.noncer.next_nonce()?;
        let signed = self
            .signer
            .sign(&self.credential, request.clone(), nonce, timestamp)?;
        *request = signed.request;

        debug!(
            "Signed {} {} for index {} ({})",
            request.method,
            request.url.path(),
            self.credential.index_id(),
            self.signer.algorithm()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "search-auth"
    }
}
