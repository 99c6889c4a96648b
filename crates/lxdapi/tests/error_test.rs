// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error type tests for lxdapi.

use std::path::PathBuf;

use lxdapi::{ApiError, Method, Transaction};
use serde_json::json;

fn transaction(status: u16, body: serde_json::Value) -> Transaction {
    Transaction::new(
        Method::Delete,
        "http://lxd.test/1.0/containers/c1",
        None,
        status,
        body,
    )
}

#[test]
fn test_config_error_display() {
    let err = ApiError::Config("bad timeout".to_string());
    assert!(err.to_string().contains("configuration error"));
    assert!(err.to_string().contains("bad timeout"));
}

#[test]
fn test_socket_not_found_display() {
    let err = ApiError::SocketNotFound(PathBuf::from("/var/lib/lxd/unix.socket"));
    assert_eq!(
        err.to_string(),
        "socket /var/lib/lxd/unix.socket does not exist"
    );
}

#[test]
fn test_transport_error_display() {
    let err = ApiError::Transport("connection refused".to_string());
    assert!(err.to_string().contains("transport error"));
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn test_not_found_display_uses_error_field() {
    let err = ApiError::NotFound(Box::new(transaction(404, json!({"error": "not found"}))));
    assert_eq!(
        err.to_string(),
        "not found: DELETE http://lxd.test/1.0/containers/c1 not found"
    );
    assert!(err.is_not_found());
}

#[test]
fn test_operation_display_uses_metadata_err() {
    let err = ApiError::Operation(Box::new(transaction(
        200,
        json!({"metadata": {"status": "Failure", "err": "container is running"}}),
    )));
    let display = err.to_string();
    assert!(display.starts_with("operation failed: DELETE http://lxd.test/1.0/containers/c1"));
    assert!(display.ends_with("container is running"));
    assert!(!err.is_not_found());
}

#[test]
fn test_missing_operation_display() {
    let err = ApiError::MissingOperation(Box::new(transaction(200, json!({}))));
    assert_eq!(
        err.to_string(),
        "no operation handle in response to DELETE http://lxd.test/1.0/containers/c1"
    );
}

#[test]
fn test_timeout_display() {
    let err = ApiError::Timeout {
        operation: "/1.0/operations/abc".to_string(),
        waited_ms: 1500,
    };
    let display = err.to_string();
    assert!(display.contains("1500ms"));
    assert!(display.contains("/1.0/operations/abc"));
    assert!(display.contains("outcome unknown"));
}

#[test]
fn test_transaction_accessor() {
    let err = ApiError::Operation(Box::new(transaction(500, json!({"error": "boom"}))));
    let txn = err.transaction().unwrap();
    assert_eq!(txn.status(), 500);
    assert_eq!(txn.method(), Method::Delete);

    assert!(ApiError::Config("x".to_string()).transaction().is_none());
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
}

#[test]
fn test_from_serde_json_error() {
    let json_err: Result<(), serde_json::Error> = serde_json::from_str::<()>("invalid");

    let api_err: ApiError = json_err.unwrap_err().into();
    assert!(matches!(api_err, ApiError::Serialization(_)));
}

#[test]
fn test_from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "socket gone");
    let api_err: ApiError = io_err.into();
    assert!(matches!(api_err, ApiError::Transport(_)));
}
