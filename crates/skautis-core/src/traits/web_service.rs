// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability set shared by web services and their decorators.

use serde_json::Value;

use crate::error::SkautisError;
use crate::events::Listener;
use crate::types::{CallArgs, EventKind};

/// One remote named service (or a decorator wrapping one).
///
/// Decorators implement the same trait and forward `subscribe` to the
/// service they wrap, so listeners always end up on the innermost service.
pub trait WebService: Send + Sync {
    /// Calls a remote operation and returns the unwrapped response.
    fn call(&self, function: &str, args: CallArgs) -> Result<Value, SkautisError>;

    /// Adds a call lifecycle listener.
    fn subscribe(&self, kind: EventKind, listener: Listener);
}
