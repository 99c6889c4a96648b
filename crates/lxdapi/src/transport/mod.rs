// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Transport implementations.
//!
//! A transport performs exactly one HTTP round trip per call and knows nothing
//! about LXD envelopes or operations:
//! - `unix`: HTTP/1.1 over the local LXD unix socket
//! - `network`: plain network endpoint via reqwest

pub mod network;
pub mod unix;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::endpoint::{Endpoint, EndpointKind};
use crate::error::Result;
use crate::types::Method;

pub use self::network::HttpTransport;
pub use self::unix::UnixSocketTransport;

/// A single request handed to a transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    /// Absolute path, version segment included (e.g. `/1.0/containers`).
    pub path: String,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<Value>,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
}

/// Raw outcome of one round trip.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

/// Transport trait for sending requests to the API.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and decode the response body.
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse>;
}

/// Build the transport matching an endpoint.
pub fn for_endpoint(endpoint: &Endpoint) -> Result<Arc<dyn Transport>> {
    match endpoint.kind() {
        EndpointKind::Unix(path) => Ok(Arc::new(UnixSocketTransport::new(path))),
        EndpointKind::Network => Ok(Arc::new(HttpTransport::new(endpoint.base_url())?)),
    }
}

/// Decode a response body: JSON when possible, the raw text otherwise, and
/// `null` when empty.
pub(crate) fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
