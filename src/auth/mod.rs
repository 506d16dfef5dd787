// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request authentication
//!
//! Every request the client sends is signed with the tenant's derived key:
//!
//! - **Credential**: index identifier plus derived key, owned by one client
//! - **Nonce**: fresh CSPRNG token per request, never reused
//! - **Signer**: HMAC over time, nonce and the exact bytes transmitted
//! - **Plugin**: interceptor applying the signer to every outgoing request
//!
//! ## Security Considerations
//!
//! - The derived key is never transmitted, logged or serialized
//! - A retried request is rebuilt and signed with a new nonce and timestamp
//! - Signing failures abort the request before transmission

pub mod credential;
pub mod nonce;
pub mod plugin;
pub mod signer;

pub use credential::{DerivedKey, TenantCredential};
pub use nonce::{Nonce, NonceSource, RandomNoncer};
pub use plugin::SearchAuthPlugin;
pub use signer::{RequestSignature, RequestSigner, SignatureAlgorithm, SignedRequest};
