// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HMAC request signing
//!
//! The gateway expects: `hmac = HMAC(derived_key, "{time}{nonce}{payload}")`,
//! hex-encoded, where `payload` is the form body for POST and the request path
//! (plus `?query` when present) for GET and HEAD. The three values travel as
//! cookies so they never collide with search parameter names:
//!
//! ```text
//! Cookie: acquia_solr_time=1700000000; acquia_solr_nonce=...; acquia_solr_hmac=...;
//! ```
//!
//! The trailing `;` is required by the gateway.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha1::Sha1;
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use super::credential::{DerivedKey, TenantCredential};
use super::nonce::Nonce;
use crate::search::transport::RequestDescriptor;
use crate::search::types::{HttpMethod, Result, SearchError};

/// Cookie carrying the request time
pub const TIME_COOKIE: &str = "acquia_solr_time";

/// Cookie carrying the nonce
pub const NONCE_COOKIE: &str = "acquia_solr_nonce";

/// Cookie carrying the hex digest
pub const HMAC_COOKIE: &str = "acquia_solr_hmac";

/// MAC used for the digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureAlgorithm {
    /// HMAC-SHA1, the gateway's scheme
    #[default]
    HmacSha1,
    /// HMAC-SHA256
    HmacSha256,
}

impl FromStr for SignatureAlgorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hmac-sha1" | "sha1" => Ok(SignatureAlgorithm::HmacSha1),
            "hmac-sha256" | "sha256" => Ok(SignatureAlgorithm::HmacSha256),
            other => Err(SearchError::configuration(format!(
                "unknown signature algorithm '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureAlgorithm::HmacSha1 => f.write_str("hmac-sha1"),
            SignatureAlgorithm::HmacSha256 => f.write_str("hmac-sha256"),
        }
    }
}

/// Signature fields attached to one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSignature {
    /// Unix time in seconds
    pub timestamp: u64,
    /// Single-use nonce
    pub nonce: Nonce,
    /// Lowercase hex MAC
    pub digest: String,
}

impl RequestSignature {
    /// `Cookie` header value carrying the signature
    pub fn cookie_value(&self) -> String {
        format!(
            "{}={}; {}={}; {}={};",
            TIME_COOKIE, self.timestamp, NONCE_COOKIE, self.nonce, HMAC_COOKIE, self.digest
        )
    }

    /// Add the signature cookies to `request`, after any cookies already set
    pub fn attach(&self, request: &mut RequestDescriptor) {
        let cookie = match request.header("Cookie") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{}; {}", existing.trim().trim_end_matches(';'), self.cookie_value())
            }
            _ => self.cookie_value(),
        };
        request.set_header("Cookie", cookie);
    }
}

/// A request together with the signature already attached to it
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// Request ready for transmission
    pub request: RequestDescriptor,
    /// Signature carried by the request
    pub signature: RequestSignature,
}

/// Computes request signatures
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSigner {
    algorithm: SignatureAlgorithm,
}

impl RequestSigner {
    /// Signer using `algorithm`
    pub fn new(algorithm: SignatureAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Configured MAC
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Bytes covered by the signature: the POST body, or path and query
    pub fn payload(request: &RequestDescriptor) -> String {
        match request.method {
            HttpMethod::Post => request.body.clone().unwrap_or_default(),
            HttpMethod::Get | HttpMethod::Head => request.path_and_query(),
        }
    }

    /// Compute the signature for `request` without modifying it
    pub fn signature_for(
        &self,
        credential: &TenantCredential,
        request: &RequestDescriptor,
        nonce: Nonce,
        timestamp: u64,
    ) -> Result<RequestSignature> {
        if credential.index_id().trim().is_empty() {
            return Err(SearchError::signing("credential has no index identifier"));
        }
        if credential.derived_key().is_empty() {
            return Err(SearchError::signing("credential has no derived key"));
        }
        if nonce.as_str().is_empty() {
            return Err(SearchError::signing("nonce is empty"));
        }

        let message = format!("{}{}{}", timestamp, nonce, Self::payload(request));
        let digest = self.digest(credential.derived_key(), message.as_bytes())?;

        Ok(RequestSignature {
            timestamp,
            nonce,
            digest,
        })
    }

    /// Sign `request` and attach the signature cookies
    pub fn sign(
        &self,
        credential: &TenantCredential,
        mut request: RequestDescriptor,
        nonce: Nonce,
        timestamp: u64,
    ) -> Result<SignedRequest> {
        let signature = self.signature_for(credential, &request, nonce, timestamp)?;
        signature.attach(&mut request);
        Ok(SignedRequest { request, signature })
    }

    fn digest(&self, key: &DerivedKey, message: &[u8]) -> Result<String> {
        let bytes = match self.algorithm {
            SignatureAlgorithm::HmacSha1 => {
                let mut mac = Hmac::<Sha1>::new_from_slice(key.expose())
                    .map_err(|e| SearchError::signing(format!("invalid key: {}", e)))?;
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            SignatureAlgorithm::HmacSha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(key.expose())
                    .map_err(|e| SearchError::signing(format!("invalid key: {}", e)))?;
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
        };
        Ok(hex::encode(bytes))
    }
}

/// Current Unix time in seconds
pub fn unix_timestamp() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| SearchError::signing(format!("system clock is before the Unix epoch: {}", e)))
}
