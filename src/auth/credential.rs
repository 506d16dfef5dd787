// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tenant credentials
//!
//! **Security**: the derived key is held in memory only. Its `Debug` output is
//! redacted and it is never serialized or logged.

use std::fmt;

/// Per-tenant secret used to key request signatures
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey(Vec<u8>);

impl DerivedKey {
    /// Wrap raw key bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Key bytes, for the MAC only
    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }

    /// Whether the key has no bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for DerivedKey {
    fn from(key: &str) -> Self {
        Self::new(key.as_bytes())
    }
}

impl From<String> for DerivedKey {
    fn from(key: String) -> Self {
        Self::new(key.into_bytes())
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}

/// Index identifier plus the derived key provisioned for it
#[derive(Debug, Clone)]
pub struct TenantCredential {
    index_id: String,
    derived_key: DerivedKey,
}

impl TenantCredential {
    /// Create a credential. Completeness is checked when signing.
    pub fn new(index_id: impl Into<String>, derived_key: impl Into<DerivedKey>) -> Self {
        Self {
            index_id: index_id.into(),
            derived_key: derived_key.into(),
        }
    }

    /// Index identifier
    pub fn index_id(&self) -> &str {
        &self.index_id
    }

    pub(crate) fn derived_key(&self) -> &DerivedKey {
        &self.derived_key
    }

    /// Both the index identifier and the derived key are present
    pub fn is_complete(&self) -> bool {
        !self.index_id.trim().is_empty() && !self.derived_key.is_empty()
    }
}
