// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory LXD server for reconciler tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use lxdapi::{Api, ApiConfig};
use serde_json::{Value, json};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

#[derive(Default)]
struct State {
    containers: BTreeMap<String, String>,
    images: BTreeSet<String>,
    aliases: BTreeMap<String, (String, String)>,
    operations: HashMap<u32, Value>,
    next_operation: u32,
}

impl State {
    fn operation(&mut self, metadata: Value) -> ResponseTemplate {
        self.next_operation += 1;
        let id = self.next_operation;
        self.operations.insert(id, metadata);
        ResponseTemplate::new(202).set_body_json(json!({
            "type": "async",
            "status": "Operation created",
            "status_code": 100,
            "operation": format!("/1.0/operations/{}", id),
            "metadata": {"id": id.to_string(), "status": "Running", "status_code": 103}
        }))
    }
}

/// Fake LXD holding containers, images and aliases in memory. Mutations
/// answer with an operation that reports success on wait.
#[derive(Clone, Default)]
pub struct FakeLxd {
    state: Arc<Mutex<State>>,
}

impl FakeLxd {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(self, name: &str, status: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .containers
            .insert(name.to_string(), status.to_string());
        self
    }

    pub fn with_image(self, fingerprint: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .images
            .insert(fingerprint.to_string());
        self
    }

    pub fn with_alias(self, name: &str, target: &str, description: &str) -> Self {
        self.state.lock().unwrap().aliases.insert(
            name.to_string(),
            (target.to_string(), description.to_string()),
        );
        self
    }

    pub fn container_status(&self, name: &str) -> Option<String> {
        self.state.lock().unwrap().containers.get(name).cloned()
    }

    pub fn has_image(&self, fingerprint: &str) -> bool {
        self.state.lock().unwrap().images.contains(fingerprint)
    }

    pub fn alias_target(&self, name: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .aliases
            .get(name)
            .map(|(target, _)| target.clone())
    }

    /// Start a mock server routed entirely through this fake.
    pub async fn serve(&self) -> MockServer {
        init_logging();
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(self.clone())
            .mount(&server)
            .await;
        server
    }
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "type": "error",
        "error": "not found",
        "error_code": 404
    }))
}

fn sync(metadata: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "type": "sync",
        "status": "Success",
        "status_code": 200,
        "operation": "",
        "metadata": metadata
    }))
}

fn bad_request(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "type": "error",
        "error": message,
        "error_code": 400
    }))
}

fn status_code(status: &str) -> u16 {
    match status {
        "Running" => 103,
        "Stopped" => 102,
        "Frozen" => 110,
        _ => 0,
    }
}

impl Respond for FakeLxd {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let segments: Vec<&str> = request
            .url
            .path()
            .trim_start_matches("/1.0/")
            .split('/')
            .collect();

        match (request.method.as_str(), segments.as_slice()) {
            ("GET", ["containers"]) => sync(json!(
                state
                    .containers
                    .keys()
                    .map(|name| format!("/1.0/containers/{}", name))
                    .collect::<Vec<_>>()
            )),
            ("POST", ["containers"]) => {
                let name = body["name"].as_str().unwrap_or_default().to_string();
                if state.containers.contains_key(&name) {
                    return bad_request("container already exists");
                }
                state.containers.insert(name.clone(), "Stopped".to_string());
                state.operation(json!({"containers": [format!("/1.0/containers/{}", name)]}))
            }
            ("GET", ["containers", name]) => match state.containers.get(*name) {
                Some(status) => sync(json!({
                    "name": name,
                    "status": status,
                    "status_code": status_code(status)
                })),
                None => not_found(),
            },
            ("PUT", ["containers", name, "state"]) => {
                let Some(current) = state.containers.get(*name).cloned() else {
                    return not_found();
                };
                let next = match body["action"].as_str() {
                    Some("start") | Some("unfreeze") => "Running",
                    Some("stop") => {
                        if current == "Frozen" && body["force"] != json!(true) {
                            return bad_request("frozen container requires force");
                        }
                        "Stopped"
                    }
                    Some("freeze") => "Frozen",
                    _ => return bad_request("unknown action"),
                };
                state.containers.insert(name.to_string(), next.to_string());
                state.operation(json!({}))
            }
            ("DELETE", ["containers", name]) => match state.containers.get(*name).cloned() {
                None => not_found(),
                Some(status) if status != "Stopped" => bad_request("container is running"),
                Some(_) => {
                    state.containers.remove(*name);
                    state.operation(json!({}))
                }
            },
            ("GET", ["operations", id, "wait"]) => {
                let Some(metadata) = id
                    .parse::<u32>()
                    .ok()
                    .and_then(|id| state.operations.get(&id).cloned())
                else {
                    return not_found();
                };
                sync(json!({
                    "id": id,
                    "status": "Success",
                    "status_code": 200,
                    "err": "",
                    "metadata": metadata
                }))
            }
            ("GET", ["images", "aliases", name]) => match state.aliases.get(*name) {
                Some((target, description)) => sync(json!({
                    "name": name,
                    "target": target,
                    "description": description
                })),
                None => not_found(),
            },
            ("POST", ["images", "aliases"]) => {
                let name = body["name"].as_str().unwrap_or_default().to_string();
                let target = body["target"].as_str().unwrap_or_default().to_string();
                let description = body["description"].as_str().unwrap_or_default().to_string();
                state.aliases.insert(name, (target, description));
                sync(json!({}))
            }
            ("PUT", ["images", "aliases", name]) => {
                if !state.aliases.contains_key(*name) {
                    return not_found();
                }
                let target = body["target"].as_str().unwrap_or_default().to_string();
                let description = body["description"].as_str().unwrap_or_default().to_string();
                state.aliases.insert(name.to_string(), (target, description));
                sync(json!({}))
            }
            ("GET", ["images", fingerprint]) => {
                if state.images.contains(*fingerprint) {
                    sync(json!({"fingerprint": fingerprint}))
                } else {
                    not_found()
                }
            }
            ("POST", ["images"]) => {
                let fingerprint = body["source"]["fingerprint"]
                    .as_str()
                    .unwrap_or("f00d")
                    .to_string();
                state.images.insert(fingerprint.clone());
                state.operation(json!({"fingerprint": fingerprint, "size": 1024}))
            }
            ("DELETE", ["images", fingerprint]) => {
                if state.images.remove(*fingerprint) {
                    state.operation(json!({}))
                } else {
                    not_found()
                }
            }
            _ => not_found(),
        }
    }
}

/// Reconciler logs, filtered by `RUST_LOG`.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn api_for(server: &MockServer) -> Api {
    Api::new(ApiConfig::remote(server.uri())).unwrap()
}

/// `METHOD /path` of every request the server has seen, in order.
pub async fn requests(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect()
}

/// Requests other than reads and operation waits.
pub async fn mutations(server: &MockServer) -> Vec<String> {
    requests(server)
        .await
        .into_iter()
        .filter(|r| !r.starts_with("GET "))
        .collect()
}

pub async fn waits(server: &MockServer) -> usize {
    requests(server)
        .await
        .iter()
        .filter(|r| r.ends_with("/wait"))
        .count()
}

/// Parsed body of the `n`th request matching `METHOD /path`.
pub async fn request_body(server: &MockServer, method_and_path: &str, n: usize) -> Value {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| format!("{} {}", r.method, r.url.path()) == method_and_path)
        .nth(n)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .unwrap_or(Value::Null)
}
