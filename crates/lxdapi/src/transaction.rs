// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! One request/response exchange and its validation.
//!
//! LXD wraps results in envelopes: a `200` answer may still carry a
//! `metadata` mapping whose own `status_code` reports a failure, and that
//! mapping may nest another `metadata` further down. [`Transaction::validate`]
//! walks the whole chain.

use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::types::{Method, OperationStatus};

/// A completed request/response pair with the decoded response body.
///
/// Immutable once built; validation either hands it back or moves it into an
/// [`ApiError`].
#[derive(Debug, Clone)]
pub struct Transaction {
    method: Method,
    url: String,
    request_body: Option<Value>,
    status: u16,
    body: Value,
}

impl Transaction {
    pub fn new(
        method: Method,
        url: impl Into<String>,
        request_body: Option<Value>,
        status: u16,
        body: Value,
    ) -> Self {
        Self {
            method,
            url: url.into(),
            request_body,
            status,
            body,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Resolved absolute URL of the request.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn request_body(&self) -> Option<&Value> {
        self.request_body.as_ref()
    }

    /// HTTP status code of the response.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Decoded response body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    /// Top-level body field, `None` when missing or when the body is not a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The `metadata` field, whatever its type.
    pub fn metadata(&self) -> Option<&Value> {
        self.get("metadata")
    }

    /// A string field of the `metadata` mapping.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata()
            .and_then(|metadata| metadata.get(key))
            .and_then(Value::as_str)
    }

    /// Top-level `error` message, ignoring empty strings.
    pub fn error(&self) -> Option<&str> {
        self.get_str("error").filter(|s| !s.is_empty())
    }

    /// `metadata.err` message, ignoring empty strings.
    pub fn metadata_err(&self) -> Option<&str> {
        self.metadata_str("err").filter(|s| !s.is_empty())
    }

    /// `metadata.status`, e.g. `Running` for a container or `Success` for an operation.
    pub fn metadata_status(&self) -> Option<&str> {
        self.metadata_str("status")
    }

    /// Operation state reported by `metadata.status`.
    pub fn operation_status(&self) -> OperationStatus {
        self.metadata_status()
            .map(OperationStatus::from)
            .unwrap_or(OperationStatus::Unknown)
    }

    /// Operation handle of an asynchronous call.
    pub fn operation(&self) -> Option<&str> {
        self.get_str("operation").filter(|s| !s.is_empty())
    }

    /// Check the response for failures.
    ///
    /// HTTP 404 gives [`ApiError::NotFound`]; any other status >= 400, or a
    /// `status_code >= 400` in any nested `metadata` mapping, gives
    /// [`ApiError::Operation`].
    pub fn validate(self) -> Result<Self> {
        if self.status == 404 {
            return Err(ApiError::NotFound(Box::new(self)));
        }

        if self.status >= 400 || nested_failure(&self.body) {
            return Err(ApiError::Operation(Box::new(self)));
        }

        Ok(self)
    }

    /// Human-readable failure description: method, URL and the best message
    /// found in the body (`error`, then `metadata.err`, then the whole body).
    pub fn error_message(&self) -> String {
        let detail = match (self.error(), self.metadata_err()) {
            (Some(error), _) => error.to_string(),
            (None, Some(err)) => err.to_string(),
            (None, None) => pretty(&self.body),
        };

        format!("{} {} {}", self.method, self.url, detail)
    }

    /// Request method, URL and (when present) the pretty-printed request body.
    pub fn request_summary(&self) -> String {
        describe_request(self.method, &self.url, self.request_body.as_ref())
    }

    /// Response status line and pretty-printed response body.
    pub fn response_summary(&self) -> String {
        format!("HTTP/{}\n{}", self.status, pretty(&self.body))
    }
}

/// True when a `metadata` mapping at any depth reports `status_code >= 400`.
fn nested_failure(body: &Value) -> bool {
    let mut current = body;

    while let Some(metadata) = current.get("metadata").filter(|m| m.is_object()) {
        let failed = metadata
            .get("status_code")
            .and_then(Value::as_f64)
            .is_some_and(|code| code >= 400.0);
        if failed {
            return true;
        }
        current = metadata;
    }

    false
}

pub(crate) fn describe_request(method: Method, url: &str, body: Option<&Value>) -> String {
    let mut summary = format!("{} {}", method, url);
    if let Some(body) = body {
        summary.push('\n');
        summary.push_str(&pretty(body));
    }
    summary
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
