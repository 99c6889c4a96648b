// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Container reconcilers.

use lxdapi::{Api, Transaction, quote};
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::error::{Result, ShortcutError};
use crate::types::{ContainerStatus, Reconciled};

fn container_path(name: &str) -> String {
    format!("containers/{}", quote(name))
}

fn state_path(name: &str) -> String {
    format!("containers/{}/state", quote(name))
}

/// Fetch a container, `None` when it does not exist.
#[instrument(skip(api))]
pub async fn container_get(api: &Api, name: &str) -> Result<Option<Transaction>> {
    match api.get(&container_path(name)).await {
        Ok(txn) => Ok(Some(txn)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Whether `name` is in the container listing.
#[instrument(skip(api))]
pub async fn container_exists(api: &Api, name: &str) -> Result<bool> {
    let listing = api.get("containers").await?;
    let urls = listing
        .metadata()
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ShortcutError::UnexpectedResponse(format!(
                "container listing from {} is not an array",
                listing.url()
            ))
        })?;

    let quoted = quote(name);
    Ok(urls
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|url| url.rsplit('/').next())
        .any(|last| last == name || last == quoted))
}

/// Create the container described by `config` unless one with its name
/// already exists. An existing container is returned as is, its
/// configuration is not compared.
#[instrument(skip(api, config), fields(container))]
pub async fn container_apply_config(api: &Api, config: &Value) -> Result<Reconciled<Transaction>> {
    let name = config_name(config)?;
    tracing::Span::current().record("container", name);

    if let Some(existing) = container_get(api, name).await? {
        return Ok(Reconciled::unchanged(existing));
    }

    info!(container = %name, "creating container");
    let created = api.post("containers", config.clone()).await?;
    api.wait(&created, None).await?;

    let container = api.get(&container_path(name)).await?;
    Ok(Reconciled::changed(container))
}

/// Move a container to `status`. Fails with not-found if it does not exist.
#[instrument(skip(api))]
pub async fn container_apply_status(
    api: &Api,
    name: &str,
    status: ContainerStatus,
) -> Result<Reconciled<Transaction>> {
    let container = api.get(&container_path(name)).await?;
    apply_status_to(api, name, container, status).await
}

async fn apply_status_to(
    api: &Api,
    name: &str,
    container: Transaction,
    status: ContainerStatus,
) -> Result<Reconciled<Transaction>> {
    let observed = container.metadata_status();
    if observed == Some(status.as_str()) {
        return Ok(Reconciled::unchanged(container));
    }

    let action = status.action_from(observed);
    info!(
        container = %name,
        from = observed.unwrap_or("unknown"),
        to = %status,
        action,
        "changing container status"
    );
    change_state(api, name, action, false).await?;

    let refreshed = api.get(&container_path(name)).await?;
    Ok(Reconciled::changed(refreshed))
}

/// Ensure a container built from `config` exists and is in `status`.
#[instrument(skip(api, config), fields(container))]
pub async fn container_present(
    api: &Api,
    config: &Value,
    status: ContainerStatus,
) -> Result<Reconciled<Transaction>> {
    let name = config_name(config)?;
    tracing::Span::current().record("container", name);

    let applied = container_apply_config(api, config).await?;
    let converged = apply_status_to(api, name, applied.resource, status).await?;

    Ok(Reconciled {
        resource: converged.resource,
        changed: applied.changed || converged.changed,
    })
}

/// Delete a container and wait for the operation.
#[instrument(skip(api))]
pub async fn container_destroy(api: &Api, name: &str) -> Result<Transaction> {
    info!(container = %name, "deleting container");
    let deleted = api.delete(&container_path(name)).await?;
    Ok(api.wait(&deleted, None).await?)
}

/// Ensure a container does not exist. A running or frozen container is
/// stopped first, frozen ones forcibly.
#[instrument(skip(api))]
pub async fn container_absent(api: &Api, name: &str) -> Result<Reconciled<()>> {
    let Some(container) = container_get(api, name).await? else {
        return Ok(Reconciled::unchanged(()));
    };

    let observed = container.metadata_status();
    if observed != Some(ContainerStatus::Stopped.as_str()) {
        let force = observed == Some(ContainerStatus::Frozen.as_str());
        info!(
            container = %name,
            status = observed.unwrap_or("unknown"),
            force,
            "stopping container before delete"
        );
        change_state(api, name, "stop", force).await?;
    }

    container_destroy(api, name).await?;
    Ok(Reconciled::changed(()))
}

async fn change_state(api: &Api, name: &str, action: &str, force: bool) -> Result<Transaction> {
    let mut body = json!({
        "action": action,
        "timeout": api.default_timeout().as_secs(),
    });
    if force {
        body["force"] = Value::Bool(true);
    }

    let changed = api.put(&state_path(name), body).await?;
    Ok(api.wait(&changed, None).await?)
}

fn config_name(config: &Value) -> Result<&str> {
    config
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ShortcutError::InvalidInput("container config requires a name".to_string()))
}
