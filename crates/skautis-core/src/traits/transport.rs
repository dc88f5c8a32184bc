// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The underlying RPC mechanism the web services are layered on.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{RemoteFault, SkautisError};
use crate::types::CallOptions;

/// Invokes named remote operations on one endpoint.
pub trait Transport: Send + Sync {
    /// Sends `envelope` to `operation` and returns the raw structured response.
    fn invoke(&self, operation: &str, envelope: &Value) -> Result<Value, RemoteFault>;
}

/// Opens transports for WSDL URLs.
pub trait Connector: Send + Sync {
    /// Creates a transport for the service described at `wsdl_url`.
    fn connect(
        &self,
        wsdl_url: &str,
        options: &CallOptions,
    ) -> Result<Arc<dyn Transport>, SkautisError>;
}

/// Lightweight availability check.
pub trait StatusProbe: Send + Sync {
    /// Returns the HTTP status code served at `url`.
    fn status(&self, url: &str) -> Result<u16, SkautisError>;
}
