// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! lxdapi
//!
//! Thin client for the LXD HTTP API, over the local unix socket or a network
//! endpoint.
//!
//! This crate does not model LXD resources. It takes care of the parts every
//! caller needs:
//! - URL resolution (`containers` becomes `{endpoint}/1.0/containers`)
//! - Response validation, including failures nested inside `metadata`
//! - Waiting for asynchronous operations to finish
//! - Optional dumps of every transaction for debugging
//!
//! Idempotent helpers built on top of it live in `lxdapi-shortcuts`.
//!
//! # Example
//!
//! ```no_run
//! use lxdapi::{Api, ApiConfig};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Local socket with transaction dumps
//! let api = Api::new(ApiConfig::default().with_debug(true))?;
//!
//! // Start a container and wait for the operation
//! let started = api
//!     .put("containers/c1/state", json!({"action": "start", "timeout": 30}))
//!     .await?;
//! api.wait(&started, None).await?;
//!
//! // 404 is a distinct error
//! match api.get("containers/missing").await {
//!     Err(e) if e.is_not_found() => println!("absent"),
//!     other => println!("{:?}", other.map(|t| t.status())),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod endpoint;
mod error;
mod transaction;
pub mod transport;
mod types;

pub use client::Api;
pub use config::{ApiConfig, DEFAULT_SOCKET_PATH, DEFAULT_TIMEOUT_SECS, DEFAULT_VERSION};
pub use endpoint::{Endpoint, EndpointKind, quote};
pub use error::{ApiError, Result};
pub use transaction::Transaction;
pub use transport::{Transport, TransportRequest, TransportResponse};
pub use types::{Method, OperationStatus};
