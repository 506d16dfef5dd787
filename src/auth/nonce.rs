// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-use nonces for request signing

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

use crate::search::types::{Result, SearchError};

/// Random bytes per nonce
pub const NONCE_BYTES: usize = 24;

/// A single-use random token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nonce(String);

impl Nonce {
    /// Wrap an already-generated value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Nonce as sent on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces a fresh nonce per request
///
/// Implementations are called concurrently from every in-flight request.
pub trait NonceSource: Send + Sync {
    /// Draw a new nonce
    fn next_nonce(&self) -> Result<Nonce>;
}

/// Nonces drawn from the operating system CSPRNG
///
/// Stateless: every call reads fresh bytes, so no locking is needed.
#[derive(Debug, Clone, Copy)]
pub struct RandomNoncer {
    byte_len: usize,
}

impl RandomNoncer {
    /// Noncer producing [`NONCE_BYTES`] random bytes per nonce
    pub fn new() -> Self {
        Self {
            byte_len: NONCE_BYTES,
        }
    }

    /// Noncer with a custom entropy size (at least 16 bytes)
    pub fn with_byte_len(byte_len: usize) -> Result<Self> {
        if byte_len < 16 {
            return Err(SearchError::configuration(format!(
                "nonce must carry at least 16 random bytes, got {}",
                byte_len
            )));
        }
        Ok(Self { byte_len })
    }
}

impl Default for RandomNoncer {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceSource for RandomNoncer {
    fn next_nonce(&self) -> Result<Nonce> {
        let mut bytes = vec![0u8; self.byte_len];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| SearchError::signing(format!("nonce generation failed: {}", e)))?;
        Ok(Nonce(URL_SAFE_NO_PAD.encode(&bytes)))
    }
}
