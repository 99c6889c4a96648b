// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! lxdapi-shortcuts
//!
//! Idempotent helpers over [`lxdapi::Api`]. Each reconciler reads the current
//! state, issues only the calls needed to reach the desired one, waits for
//! the resulting operations and reports whether anything changed.
//!
//! # Example
//!
//! ```no_run
//! use lxdapi::Api;
//! use lxdapi_shortcuts::{ContainerStatus, container_present};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Api::local()?;
//! let config = json!({
//!     "name": "c1",
//!     "source": {"type": "image", "alias": "debian/12"}
//! });
//!
//! let result = container_present(&api, &config, ContainerStatus::Running).await?;
//! if result.changed {
//!     println!("c1 converged to {:?}", result.resource.metadata_status());
//! }
//! # Ok(())
//! # }
//! ```

mod alias;
mod container;
mod error;
mod image;
mod types;

pub use alias::{alias_get, alias_present};
pub use container::{
    container_absent, container_apply_config, container_apply_status, container_destroy,
    container_exists, container_get, container_present,
};
pub use error::{Result, ShortcutError};
pub use image::{image_absent, image_get, image_present};
pub use types::{ContainerStatus, Reconciled};
