// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP over the local LXD unix socket.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::Request;
use hyper::body::Bytes;
use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;
use tracing::debug;

use super::{Transport, TransportRequest, TransportResponse, decode_body};
use crate::error::{ApiError, Result};

/// Opens one connection per request to a unix socket.
#[derive(Debug, Clone)]
pub struct UnixSocketTransport {
    socket_path: PathBuf,
}

impl UnixSocketTransport {
    pub fn new(socket_path: impl AsRef<Path>) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

#[async_trait]
impl Transport for UnixSocketTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let stream = UnixStream::connect(&self.socket_path).await.map_err(|e| {
            ApiError::Transport(format!(
                "failed to connect to {}: {}",
                self.socket_path.display(),
                e
            ))
        })?;

        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;

        // Lives only as long as this request's connection.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!("unix socket connection closed: {}", e);
            }
        });

        let mut builder = Request::builder()
            .method(http::Method::from(request.method))
            .uri(request.path.as_str())
            .header(http::header::HOST, "lxd");

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let http_request = match &request.body {
            Some(body) => {
                let bytes = serde_json::to_vec(body)?;
                builder
                    .header(http::header::CONTENT_TYPE, "application/json")
                    .header(http::header::CONTENT_LENGTH, bytes.len())
                    .body(Full::new(Bytes::from(bytes)))?
            }
            None => builder.body(Full::new(Bytes::new()))?,
        };

        let response = sender.send_request(http_request).await?;
        let status = response.status().as_u16();
        let bytes = response.into_body().collect().await?.to_bytes();

        Ok(TransportResponse {
            status,
            body: decode_body(&bytes),
        })
    }
}
