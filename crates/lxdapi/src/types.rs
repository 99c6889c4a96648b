// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request methods and operation states.

use std::fmt;

/// HTTP method of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
        }
    }
}

/// State of a background operation, as reported in `metadata.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    /// Status string not recognised.
    Unknown,
    /// Queued, not yet started.
    Pending,
    /// Currently executing.
    Running,
    /// Cancellation requested but not finished.
    Cancelling,
    /// Finished successfully.
    Success,
    /// Finished with an error.
    Failure,
    /// Cancelled before completion.
    Cancelled,
}

impl OperationStatus {
    /// The literal the server uses for a successful operation.
    pub const SUCCESS_MARKER: &'static str = "Success";

    /// Check if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationStatus::Success | OperationStatus::Failure | OperationStatus::Cancelled
        )
    }

    /// Still pending: another wait may change the outcome.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            OperationStatus::Pending | OperationStatus::Running | OperationStatus::Cancelling
        )
    }
}

impl From<&str> for OperationStatus {
    fn from(value: &str) -> Self {
        match value {
            "Pending" => OperationStatus::Pending,
            "Running" => OperationStatus::Running,
            "Cancelling" => OperationStatus::Cancelling,
            "Success" => OperationStatus::Success,
            "Failure" => OperationStatus::Failure,
            "Cancelled" => OperationStatus::Cancelled,
            _ => OperationStatus::Unknown,
        }
    }
}
