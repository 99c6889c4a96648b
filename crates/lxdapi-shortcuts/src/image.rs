// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Image reconcilers.

use lxdapi::{Api, Transaction, quote};
use serde_json::Value;
use tracing::{info, instrument};

use crate::error::Result;
use crate::types::Reconciled;

fn image_path(fingerprint: &str) -> String {
    format!("images/{}", quote(fingerprint))
}

/// Fetch an image by fingerprint, `None` when it does not exist.
#[instrument(skip(api))]
pub async fn image_get(api: &Api, fingerprint: &str) -> Result<Option<Transaction>> {
    match api.get(&image_path(fingerprint)).await {
        Ok(txn) => Ok(Some(txn)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Ensure the image `fingerprint` exists, importing it from `source` (an
/// `images` POST body) when it does not.
#[instrument(skip(api, source))]
pub async fn image_present(
    api: &Api,
    fingerprint: &str,
    source: &Value,
) -> Result<Reconciled<Transaction>> {
    if let Some(existing) = image_get(api, fingerprint).await? {
        return Ok(Reconciled::unchanged(existing));
    }

    info!(image = %fingerprint, "importing image");
    let created = api.post("images", source.clone()).await?;
    let done = api.wait(&created, None).await?;

    // The finished operation reports the fingerprint it produced.
    let imported = done
        .metadata()
        .and_then(|m| m.get("metadata"))
        .and_then(|m| m.get("fingerprint"))
        .and_then(Value::as_str)
        .unwrap_or(fingerprint);

    let image = api.get(&image_path(imported)).await?;
    Ok(Reconciled::changed(image))
}

/// Ensure the image `fingerprint` does not exist.
#[instrument(skip(api))]
pub async fn image_absent(api: &Api, fingerprint: &str) -> Result<Reconciled<()>> {
    if image_get(api, fingerprint).await?.is_none() {
        return Ok(Reconciled::unchanged(()));
    }

    info!(image = %fingerprint, "deleting image");
    let deleted = api.delete(&image_path(fingerprint)).await?;
    api.wait(&deleted, None).await?;
    Ok(Reconciled::changed(()))
}
