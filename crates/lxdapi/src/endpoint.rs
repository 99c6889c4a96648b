// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Endpoint resolution: where requests go and how paths become URLs.

use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::{ApiError, Result};

/// Characters left alone when quoting: alphanumerics and `-._~`.
const QUOTE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a value for use inside a URL, `/` included.
pub fn quote(value: &str) -> String {
    utf8_percent_encode(value, QUOTE_SET).to_string()
}

/// How the endpoint is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointKind {
    /// Local unix-domain socket.
    Unix(PathBuf),
    /// Network base URL.
    Network,
}

/// Resolved base address plus the API version prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    kind: EndpointKind,
    base_url: String,
    version: String,
}

impl Endpoint {
    /// Resolve an endpoint string.
    ///
    /// Strings starting with `/` are socket paths and must exist; the base URL
    /// becomes `http+unix://` plus the quoted path. Anything else is a network
    /// URL. One trailing slash is dropped.
    pub fn parse(endpoint: &str, version: impl Into<String>) -> Result<Self> {
        let (kind, base_url) = if endpoint.starts_with('/') {
            let socket_path = PathBuf::from(endpoint);
            if !socket_path.exists() {
                return Err(ApiError::SocketNotFound(socket_path));
            }
            let base_url = format!("http+unix://{}", quote(endpoint));
            (EndpointKind::Unix(socket_path), base_url)
        } else {
            if endpoint.is_empty() {
                return Err(ApiError::Config("endpoint must not be empty".to_string()));
            }
            (EndpointKind::Network, endpoint.to_string())
        };

        let base_url = match base_url.strip_suffix('/') {
            Some(trimmed) => trimmed.to_string(),
            None => base_url,
        };

        Ok(Self {
            kind,
            base_url,
            version: version.into(),
        })
    }

    pub fn kind(&self) -> &EndpointKind {
        &self.kind
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Socket path for unix endpoints.
    pub fn socket_path(&self) -> Option<&Path> {
        match &self.kind {
            EndpointKind::Unix(path) => Some(path),
            EndpointKind::Network => None,
        }
    }

    /// Absolute request path: relative paths get `/{version}/` prepended,
    /// paths starting with `/` are returned unchanged.
    pub fn absolute_path(&self, path: &str) -> String {
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}/{}", self.version, path)
        }
    }

    /// Full URL for a path, e.g. `containers` -> `{base}/1.0/containers`.
    pub fn format_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, self.absolute_path(path))
    }
}
