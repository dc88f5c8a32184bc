// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Counting web service for decorator tests.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde_json::{Value, json};

use skautis_core::{CallArgs, EventKind, Listener, RemoteFault, SkautisError, WebService};

/// Web service that echoes its inputs and counts calls.
///
/// Unless a function has a scripted answer, the response is
/// `{"function": <name>, "call": <n>}` so tests can tell fresh responses
/// from cached ones.
#[derive(Default)]
pub struct MockWebService {
    calls: Mutex<Vec<(String, CallArgs)>>,
    failures: Mutex<HashMap<String, SkautisError>>,
    subscriptions: Mutex<Vec<EventKind>>,
}

impl MockWebService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call to `function` fail with a protocol error.
    pub fn fail(&self, function: &str, message: &str) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                function.to_string(),
                SkautisError::Protocol {
                    fault: RemoteFault::new("Server", message),
                },
            );
    }

    /// Lets `function` succeed again.
    pub fn recover(&self, function: &str) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(function);
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn calls(&self) -> Vec<(String, CallArgs)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Event kinds subscribed through this service, in order.
    pub fn subscriptions(&self) -> Vec<EventKind> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl WebService for MockWebService {
    fn call(&self, function: &str, args: CallArgs) -> Result<Value, SkautisError> {
        let count = {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            calls.push((function.to_string(), args));
            calls.len()
        };
        if let Some(error) = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(function)
        {
            return Err(error.clone());
        }
        Ok(json!({ "function": function, "call": count }))
    }

    fn subscribe(&self, kind: EventKind, _listener: Listener) {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(kind);
    }
}
