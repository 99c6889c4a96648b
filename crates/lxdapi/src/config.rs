// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the LXD API client.

use std::time::Duration;

use crate::error::{ApiError, Result};

/// Socket used when no endpoint is configured.
pub const DEFAULT_SOCKET_PATH: &str = "/var/lib/lxd/unix.socket";

/// API version segment prepended to relative paths.
pub const DEFAULT_VERSION: &str = "1.0";

/// Server-side wait timeout used when a caller does not pass one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`Api`](crate::Api).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Unix socket path (starts with `/`) or network base URL.
    pub endpoint: String,
    /// Version segment for relative paths, e.g. `1.0`.
    pub version: String,
    /// Default timeout for operation waits.
    pub default_timeout: Duration,
    /// Dump every transaction (request and response) to the log.
    pub debug: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SOCKET_PATH.to_string(),
            version: DEFAULT_VERSION.to_string(),
            default_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            debug: false,
        }
    }
}

impl ApiConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for a remote server at `url`.
    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            endpoint: url.into(),
            ..Self::default()
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `LXDAPI_ENDPOINT`: socket path or URL (default: "/var/lib/lxd/unix.socket")
    /// - `LXDAPI_VERSION`: API version (default: "1.0")
    /// - `LXDAPI_DEFAULT_TIMEOUT_SECS`: wait timeout in seconds (default: 30)
    /// - `LXDAPI_DEBUG`: dump transactions (default: "false")
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let endpoint =
            lookup("LXDAPI_ENDPOINT").unwrap_or_else(|| DEFAULT_SOCKET_PATH.to_string());

        let version = lookup("LXDAPI_VERSION").unwrap_or_else(|| DEFAULT_VERSION.to_string());

        let default_timeout_secs: u64 = match lookup("LXDAPI_DEFAULT_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|e| {
                ApiError::Config(format!("invalid LXDAPI_DEFAULT_TIMEOUT_SECS: {}", e))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let debug = lookup("LXDAPI_DEBUG")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            endpoint,
            version,
            default_timeout: Duration::from_secs(default_timeout_secs),
            debug,
        })
    }

    /// Set the endpoint (socket path or URL).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the API version segment.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the default wait timeout.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Enable or disable transaction dumps.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
