// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value session storage contract.

use serde_json::Value;

use crate::error::SkautisError;

/// Minimal session store used to persist login state between requests.
///
/// Writes are last-write-wins; implementations need not coordinate
/// concurrent requests for the same session.
pub trait SessionAdapter: Send + Sync {
    /// Whether a value is stored under `key`.
    fn has(&self, key: &str) -> bool;

    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> Result<(), SkautisError>;
}
