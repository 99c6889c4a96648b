// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Image alias reconcilers.

use lxdapi::{Api, Transaction, quote};
use serde_json::json;
use tracing::{info, instrument};

use crate::error::Result;
use crate::types::Reconciled;

fn alias_path(name: &str) -> String {
    format!("images/aliases/{}", quote(name))
}

/// Fetch an image alias, `None` when it does not exist.
#[instrument(skip(api))]
pub async fn alias_get(api: &Api, name: &str) -> Result<Option<Transaction>> {
    match api.get(&alias_path(name)).await {
        Ok(txn) => Ok(Some(txn)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Ensure alias `name` points at `target`. A `description` of `None` leaves
/// the current description alone.
#[instrument(skip(api))]
pub async fn alias_present(
    api: &Api,
    name: &str,
    target: &str,
    description: Option<&str>,
) -> Result<Reconciled<Transaction>> {
    let response = match alias_get(api, name).await? {
        None => {
            info!(alias = %name, to = target, "creating image alias");
            api.post(
                "images/aliases",
                json!({
                    "name": name,
                    "target": target,
                    "description": description.unwrap_or_default(),
                }),
            )
            .await?
        }
        Some(existing) => {
            let same_target = existing.metadata_str("target") == Some(target);
            let same_description =
                description.is_none_or(|d| existing.metadata_str("description") == Some(d));
            if same_target && same_description {
                return Ok(Reconciled::unchanged(existing));
            }

            let description = description
                .or_else(|| existing.metadata_str("description"))
                .unwrap_or_default();
            info!(
                alias = %name,
                from = existing.metadata_str("target").unwrap_or("unknown"),
                to = target,
                "updating image alias"
            );
            api.put(
                &alias_path(name),
                json!({"target": target, "description": description}),
            )
            .await?
        }
    };

    // Alias writes are usually synchronous.
    if response.operation().is_some() {
        api.wait(&response, None).await?;
    }

    let alias = api.get(&alias_path(name)).await?;
    Ok(Reconciled::changed(alias))
}
