// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Api client: validated HTTP transactions and operation waits.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::ApiConfig;
use crate::endpoint::Endpoint;
use crate::error::{ApiError, Result};
use crate::transaction::{Transaction, describe_request};
use crate::transport::{self, Transport, TransportRequest};
use crate::types::{Method, OperationStatus};

/// Entry point for the LXD HTTP API.
///
/// Every call performs one round trip and validates the response before
/// returning it, so an `Ok` transaction never carries a failure status.
/// Asynchronous calls (container create/start/stop/delete, image upload)
/// return a transaction with an operation handle; pass it to [`Api::wait`].
///
/// # Example
///
/// ```no_run
/// use lxdapi::Api;
/// use serde_json::json;
///
/// # async fn example() -> lxdapi::Result<()> {
/// let api = Api::local()?;
/// let created = api
///     .post("containers", json!({"name": "c1", "source": {"type": "none"}}))
///     .await?;
/// api.wait(&created, None).await?;
/// # Ok(())
/// # }
/// ```
pub struct Api {
    config: ApiConfig,
    endpoint: Endpoint,
    transport: Arc<dyn Transport>,
}

impl Api {
    /// Create a client with the transport matching the configured endpoint.
    ///
    /// Fails with [`ApiError::SocketNotFound`] when the endpoint is a socket
    /// path that does not exist.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let endpoint = Endpoint::parse(&config.endpoint, config.version.clone())?;
        let transport = transport::for_endpoint(&endpoint)?;

        Ok(Self {
            config,
            endpoint,
            transport,
        })
    }

    /// Create a client that sends through a caller-supplied transport.
    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let endpoint = Endpoint::parse(&config.endpoint, config.version.clone())?;

        Ok(Self {
            config,
            endpoint,
            transport,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ApiConfig::from_env()?)
    }

    /// Client for the default local socket.
    pub fn local() -> Result<Self> {
        Self::new(ApiConfig::default())
    }

    /// Client for a remote server.
    pub fn remote(url: impl Into<String>) -> Result<Self> {
        Self::new(ApiConfig::remote(url))
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Timeout used by waits when none is given.
    pub fn default_timeout(&self) -> Duration {
        self.config.default_timeout
    }

    /// Absolute URL for `path`, see [`Endpoint::format_url`].
    pub fn format_url(&self, path: &str) -> String {
        self.endpoint.format_url(path)
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Execute a request and validate the response.
    ///
    /// Returns [`ApiError::NotFound`] for HTTP 404 and [`ApiError::Operation`]
    /// for any other failure status, including failures nested in `metadata`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Transaction> {
        self.request_with_headers(method, path, body, Vec::new())
            .await
    }

    /// Same as [`Api::request`] with extra request headers.
    #[instrument(skip(self, body, headers), fields(method = %method, path = %path))]
    pub async fn request_with_headers(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: Vec<(String, String)>,
    ) -> Result<Transaction> {
        let url = self.endpoint.format_url(path);

        if self.config.debug {
            info!(target: "lxdapi::debug", "{}", describe_request(method, &url, body.as_ref()));
        }

        let request = TransportRequest {
            method,
            path: self.endpoint.absolute_path(path),
            body,
            headers,
        };

        let response = self.transport.send(&request).await?;
        let transaction = Transaction::new(
            method,
            url,
            request.body,
            response.status,
            response.body,
        );

        if self.config.debug {
            info!(target: "lxdapi::debug", "{}\n{}", transaction.response_summary(), "=".repeat(24));
        }
        debug!(status = transaction.status(), url = %transaction.url(), "Transaction completed");

        transaction.validate()
    }

    /// GET `path`.
    pub async fn get(&self, path: &str) -> Result<Transaction> {
        self.request(Method::Get, path, None).await
    }

    /// POST a JSON body to `path`.
    pub async fn post(&self, path: &str, body: Value) -> Result<Transaction> {
        self.request(Method::Post, path, Some(body)).await
    }

    /// PUT a JSON body to `path`.
    pub async fn put(&self, path: &str, body: Value) -> Result<Transaction> {
        self.request(Method::Put, path, Some(body)).await
    }

    /// DELETE `path`.
    pub async fn delete(&self, path: &str) -> Result<Transaction> {
        self.request(Method::Delete, path, None).await
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Wait for the operation started by `transaction`.
    ///
    /// Fails with [`ApiError::MissingOperation`] when the response carried no
    /// operation handle.
    pub async fn wait(
        &self,
        transaction: &Transaction,
        timeout: Option<Duration>,
    ) -> Result<Transaction> {
        match transaction.operation() {
            Some(operation) => self.wait_operation(operation, timeout).await,
            None => Err(ApiError::MissingOperation(Box::new(transaction.clone()))),
        }
    }

    /// Issue one server-side wait on `operation` and require success.
    ///
    /// The server blocks until the operation is terminal or `timeout`
    /// (default: [`ApiConfig::default_timeout`]) elapses. Anything but a
    /// `Success` status, including an operation still running when the
    /// server gave up, is an [`ApiError::Operation`]. No retry.
    #[instrument(skip(self), fields(operation = %operation))]
    pub async fn wait_operation(
        &self,
        operation: &str,
        timeout: Option<Duration>,
    ) -> Result<Transaction> {
        let timeout = timeout.unwrap_or(self.config.default_timeout);
        let transaction = self.get(&wait_path(operation, timeout)).await?;

        if transaction.metadata_status() != Some(OperationStatus::SUCCESS_MARKER) {
            warn!(
                status = ?transaction.metadata_status(),
                "Operation did not succeed"
            );
            return Err(ApiError::Operation(Box::new(transaction)));
        }

        Ok(transaction)
    }

    /// Wait on `operation` until it is terminal or `deadline` elapses.
    ///
    /// Issues repeated bounded waits while the operation reports a pending
    /// status. Each wait asks the server for at most the default timeout and
    /// is cut off locally when the deadline passes.
    ///
    /// On [`ApiError::Timeout`] the outcome is unknown: the remote operation
    /// keeps running and is not cancelled.
    #[instrument(skip(self), fields(operation = %operation))]
    pub async fn wait_until(&self, operation: &str, deadline: Duration) -> Result<Transaction> {
        let started = Instant::now();

        loop {
            let remaining = deadline.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return Err(timeout_error(operation, started));
            }

            let path = wait_path(operation, remaining.min(self.config.default_timeout));
            let transaction = match tokio::time::timeout(remaining, self.get(&path)).await {
                Ok(result) => result?,
                Err(_) => return Err(timeout_error(operation, started)),
            };

            match transaction.operation_status() {
                OperationStatus::Success => return Ok(transaction),
                status if status.is_pending() => {
                    debug!(?status, "Operation still pending");
                }
                status => {
                    warn!(?status, "Operation finished without success");
                    return Err(ApiError::Operation(Box::new(transaction)));
                }
            }
        }
    }
}

/// `{operation}/wait?timeout={secs}`, rounding up to at least one second.
fn wait_path(operation: &str, timeout: Duration) -> String {
    let mut secs = timeout.as_secs();
    if timeout.subsec_nanos() > 0 {
        secs += 1;
    }
    format!("{}/wait?timeout={}", operation, secs.max(1))
}

fn timeout_error(operation: &str, started: Instant) -> ApiError {
    ApiError::Timeout {
        operation: operation.to_string(),
        waited_ms: started.elapsed().as_millis() as u64,
    }
}
