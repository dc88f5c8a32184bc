// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted transport, connector and probe.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use skautis_core::{CallOptions, Connector, RemoteFault, SkautisError, StatusProbe, Transport};

type Scripted = Result<Value, RemoteFault>;

/// Transport that answers from per-operation scripts and records every envelope.
///
/// One-shot answers are consumed first; after that the operation's
/// standing answer is used. Unscripted operations fail with a `Client` fault.
#[derive(Default)]
pub struct MockTransport {
    queued: Mutex<HashMap<String, VecDeque<Scripted>>>,
    standing: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every call to `operation` with `response`.
    pub fn respond(&self, operation: &str, response: Value) -> &Self {
        self.standing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(operation.to_string(), Ok(response));
        self
    }

    /// Fails every call to `operation` with `fault`.
    pub fn fail(&self, operation: &str, fault: RemoteFault) -> &Self {
        self.standing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(operation.to_string(), Err(fault));
        self
    }

    /// Answers the next call to `operation` only.
    pub fn respond_once(&self, operation: &str, response: Value) -> &Self {
        self.push(operation, Ok(response))
    }

    /// Fails the next call to `operation` only.
    pub fn fail_once(&self, operation: &str, fault: RemoteFault) -> &Self {
        self.push(operation, Err(fault))
    }

    fn push(&self, operation: &str, answer: Scripted) -> &Self {
        self.queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(operation.to_string())
            .or_default()
            .push_back(answer);
        self
    }

    /// Every `(operation, envelope)` pair seen so far, oldest first.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(op, _)| op == operation)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Envelope of the most recent call to `operation`.
    pub fn last_envelope(&self, operation: &str) -> Option<Value> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(op, _)| op == operation)
            .map(|(_, envelope)| envelope.clone())
    }
}

impl Transport for MockTransport {
    fn invoke(&self, operation: &str, envelope: &Value) -> Result<Value, RemoteFault> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((operation.to_string(), envelope.clone()));

        let queued = self
            .queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(operation)
            .and_then(VecDeque::pop_front);
        if let Some(answer) = queued {
            return answer;
        }

        self.standing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(operation)
            .cloned()
            .unwrap_or_else(|| {
                Err(RemoteFault::new(
                    "Client",
                    format!("no scripted response for {operation}"),
                ))
            })
    }
}

/// Connector that always returns the same [`MockTransport`].
pub struct MockConnector {
    transport: Arc<MockTransport>,
    connections: Mutex<Vec<(String, CallOptions)>>,
}

impl MockConnector {
    pub fn new(transport: Arc<MockTransport>) -> Self {
        Self {
            transport,
            connections: Mutex::new(Vec::new()),
        }
    }

    pub fn transport(&self) -> &Arc<MockTransport> {
        &self.transport
    }

    /// `(wsdl_url, options)` for every transport handed out.
    pub fn connections(&self) -> Vec<(String, CallOptions)> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Connector for MockConnector {
    fn connect(
        &self,
        wsdl_url: &str,
        options: &CallOptions,
    ) -> Result<Arc<dyn Transport>, SkautisError> {
        tracing::debug!(wsdl_url, "mock connection");
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((wsdl_url.to_string(), options.clone()));
        Ok(self.transport.clone())
    }
}

/// Probe returning a fixed HTTP status, or failing like an unreachable host.
pub struct FixedProbe {
    status: Option<u16>,
    probed: Mutex<Vec<String>>,
}

impl FixedProbe {
    pub fn new(status: u16) -> Self {
        Self {
            status: Some(status),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            status: None,
            probed: Mutex::new(Vec::new()),
        }
    }

    /// URLs probed so far.
    pub fn probed(&self) -> Vec<String> {
        self.probed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StatusProbe for FixedProbe {
    fn status(&self, url: &str) -> Result<u16, SkautisError> {
        self.probed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
        self.status
            .ok_or_else(|| SkautisError::Internal(format!("connection to {url} refused")))
    }
}
