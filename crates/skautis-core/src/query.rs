// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Records of individual remote calls, used by the debug log and listeners.
//!
//! A call starts as a [`PendingQuery`] (timer running) and is turned into a
//! completed [`SkautisQuery`] by exactly one of [`PendingQuery::succeeded`]
//! or [`PendingQuery::failed`]. Both consume the pending record, so a call
//! cannot be completed twice.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SkautisError;

/// A call that has started but not finished yet.
#[derive(Debug)]
pub struct PendingQuery {
    function: String,
    args: Value,
    trace: Vec<String>,
    started: Instant,
}

impl PendingQuery {
    /// Starts timing a call.
    ///
    /// The call stack is captured when backtraces are enabled
    /// (`RUST_BACKTRACE`); otherwise the trace stays empty.
    pub fn begin(function: impl Into<String>, args: Value) -> Self {
        let backtrace = Backtrace::capture();
        let trace = match backtrace.status() {
            BacktraceStatus::Captured => backtrace
                .to_string()
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect(),
            _ => Vec::new(),
        };
        Self {
            function: function.into(),
            args,
            trace,
            started: Instant::now(),
        }
    }

    /// Name of the remote operation.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Completes the call with the unwrapped response.
    pub fn succeeded(self, result: &Value) -> SkautisQuery {
        self.finish(Some(result.clone()), None)
    }

    /// Completes the call with the error it raised.
    pub fn failed(self, error: &SkautisError) -> SkautisQuery {
        self.finish(None, Some(error.clone()))
    }

    fn finish(self, result: Option<Value>, error: Option<SkautisError>) -> SkautisQuery {
        let (error_class, error_string) = match &error {
            Some(e) => (e.kind_name().to_string(), e.to_string()),
            None => (String::new(), String::new()),
        };
        SkautisQuery {
            function: self.function,
            args: self.args,
            trace: self.trace,
            elapsed: self.started.elapsed(),
            result,
            error,
            error_class,
            error_string,
        }
    }
}

/// A completed remote call.
///
/// Serializing keeps only the class name and string form of a failure; a
/// restored record reports [`SkautisQuery::error`] as `None` but still
/// answers [`SkautisQuery::has_failed`] correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "StoredQuery", from = "StoredQuery")]
pub struct SkautisQuery {
    /// Remote operation name.
    pub function: String,
    /// Request envelope as sent.
    pub args: Value,
    /// Call stack at the time the call was made.
    pub trace: Vec<String>,
    /// Wall-clock duration of the call.
    pub elapsed: Duration,
    /// Unwrapped response on success.
    pub result: Option<Value>,
    error: Option<SkautisError>,
    error_class: String,
    error_string: String,
}

impl SkautisQuery {
    /// The live error, if the call failed and the record was not restored.
    pub fn error(&self) -> Option<&SkautisError> {
        self.error.as_ref()
    }

    /// Class name of the failure, or an empty string.
    pub fn error_class(&self) -> &str {
        match &self.error {
            Some(e) => e.kind_name(),
            None => &self.error_class,
        }
    }

    /// Display form of the failure, or an empty string.
    pub fn error_string(&self) -> String {
        match &self.error {
            Some(e) => e.to_string(),
            None => self.error_string.clone(),
        }
    }

    /// Whether the call ended with an error.
    pub fn has_failed(&self) -> bool {
        self.error.is_some() || !self.error_class.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
struct StoredQuery {
    function: String,
    args: Value,
    trace: Vec<String>,
    elapsed: Duration,
    result: Option<Value>,
    exception_class: String,
    exception_string: String,
}

impl From<SkautisQuery> for StoredQuery {
    fn from(query: SkautisQuery) -> Self {
        let exception_class = query.error_class().to_string();
        let exception_string = query.error_string();
        Self {
            function: query.function,
            args: query.args,
            trace: query.trace,
            elapsed: query.elapsed,
            result: query.result,
            exception_class,
            exception_string,
        }
    }
}

impl From<StoredQuery> for SkautisQuery {
    fn from(stored: StoredQuery) -> Self {
        Self {
            function: stored.function,
            args: stored.args,
            trace: stored.trace,
            elapsed: stored.elapsed,
            result: stored.result,
            error: None,
            error_class: stored.exception_class,
            error_string: stored.exception_string,
        }
    }
}
