// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for lxdapi.

use std::path::PathBuf;

use thiserror::Error;

use crate::transaction::Transaction;

/// Result type using ApiError.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur when talking to the LXD API.
///
/// `NotFound` and `Operation` carry the whole [`Transaction`] they were raised
/// for, so callers can inspect the request and the decoded response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The local unix socket does not exist. Raised once, when the client is built.
    #[error("socket {} does not exist", .0.display())]
    SocketNotFound(PathBuf),

    /// Connection or I/O failure below the HTTP layer.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered HTTP 404.
    #[error("not found: {}", .0.error_message())]
    NotFound(Box<Transaction>),

    /// HTTP status >= 400, a nested metadata failure, or an async operation
    /// that finished without success.
    #[error("operation failed: {}", .0.error_message())]
    Operation(Box<Transaction>),

    /// A wait was requested for a transaction that carries no operation handle.
    #[error("no operation handle in response to {} {}", .0.method(), .0.url())]
    MissingOperation(Box<Transaction>),

    /// The caller-side deadline elapsed while the operation was still pending.
    ///
    /// The outcome is unknown: the remote operation keeps running.
    #[error("timed out after {waited_ms}ms waiting for {operation}, outcome unknown")]
    Timeout { operation: String, waited_ms: u64 },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// True for HTTP 404 responses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// The transaction this error was raised for, if any.
    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            ApiError::NotFound(txn) | ApiError::Operation(txn) | ApiError::MissingOperation(txn) => {
                Some(txn)
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<hyper::Error> for ApiError {
    fn from(err: hyper::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<http::Error> for ApiError {
    fn from(err: http::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
