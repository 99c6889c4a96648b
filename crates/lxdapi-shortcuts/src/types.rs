// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Desired states and reconciler results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShortcutError;

/// Container status a caller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerStatus {
    Running,
    Stopped,
    Frozen,
}

impl ContainerStatus {
    pub const ALL: [ContainerStatus; 3] = [
        ContainerStatus::Running,
        ContainerStatus::Stopped,
        ContainerStatus::Frozen,
    ];

    /// Status string as reported in container `metadata.status`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Stopped => "Stopped",
            Self::Frozen => "Frozen",
        }
    }

    /// State action that moves a container in `observed` status to `self`.
    pub fn action_from(&self, observed: Option<&str>) -> &'static str {
        match self {
            Self::Running if observed == Some(Self::Frozen.as_str()) => "unfreeze",
            Self::Running => "start",
            Self::Stopped => "stop",
            Self::Frozen => "freeze",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerStatus {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let choices: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                ShortcutError::InvalidInput(format!(
                    "status {} not understood, choices are: {}",
                    s,
                    choices.join(", ")
                ))
            })
    }
}

/// Outcome of a reconciler: the resource as it now stands and whether any
/// mutating call was issued to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled<T> {
    pub resource: T,
    pub changed: bool,
}

impl<T> Reconciled<T> {
    pub fn changed(resource: T) -> Self {
        Self {
            resource,
            changed: true,
        }
    }

    pub fn unchanged(resource: T) -> Self {
        Self {
            resource,
            changed: false,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reconciled<U> {
        Reconciled {
            resource: f(self.resource),
            changed: self.changed,
        }
    }
}
