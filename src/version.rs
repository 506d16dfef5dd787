// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the signed Solr client

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Crate name as published
pub const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

/// User agent sent by the default transport
pub fn user_agent() -> String {
    format!("{}/{}", PACKAGE_NAME, VERSION_NUMBER)
}

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Signed Solr Client {}", VERSION_NUMBER)
}
