// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for lxdapi-shortcuts.

use lxdapi::ApiError;
use thiserror::Error;

/// Result type using ShortcutError.
pub type Result<T> = std::result::Result<T, ShortcutError>;

/// Errors raised while converging a resource.
#[derive(Debug, Error)]
pub enum ShortcutError {
    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Invalid desired state.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The server answered with a shape the helper cannot use.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ShortcutError {
    /// The underlying API error, if this came from a failed call.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ShortcutError::Api(err) => Some(err),
            _ => None,
        }
    }
}
