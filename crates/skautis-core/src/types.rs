// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the web service, manager, and session layers.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Request field carrying the application id.
pub const ID_APPLICATION: &str = "ID_Application";

/// Request field carrying the login token.
pub const ID_LOGIN: &str = "ID_Login";

/// Arguments of one remote call.
///
/// `data` is the positional data map merged over the init parameters.
/// `cover` is the optional slash-separated output path that renames and
/// nests the request envelope (e.g. `"Wrapper/Inner"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs {
    pub data: Map<String, Value>,
    pub cover: Option<String>,
}

impl CallArgs {
    /// Empty arguments: no data, default envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds arguments from an existing data map.
    pub fn from_data(data: Map<String, Value>) -> Self {
        Self { data, cover: None }
    }

    /// Builds arguments from a structured value.
    ///
    /// Anything other than an object is treated as an empty data map.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(data) => Self::from_data(data),
            _ => Self::new(),
        }
    }

    /// Adds one data field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Sets the output path used to rename the envelope.
    pub fn covered(mut self, path: impl Into<String>) -> Self {
        self.cover = Some(path.into());
        self
    }

    /// Login token explicitly passed in the data map, if any.
    pub fn login_id(&self) -> Option<&str> {
        self.data.get(ID_LOGIN).and_then(Value::as_str)
    }

    /// Canonical encoding of the arguments.
    ///
    /// Keys are sorted at every level, so equal argument trees always encode
    /// to the same string regardless of insertion order.
    pub fn canonical(&self) -> String {
        let data = sorted(&Value::Object(self.data.clone()));
        serde_json::json!([data, self.cover]).to_string()
    }
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for key in keys {
                out.insert(key.clone(), sorted(&map[key]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

/// Per-service options derived from the configuration and the login token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOptions {
    /// Application id issued by the SkautIS administrators.
    pub app_id: String,
    /// Login token the service is bound to.
    pub login_id: Option<String>,
    /// Accept gzip-compressed responses.
    pub compression: bool,
    /// Decorate the service with the response cache.
    pub cache: bool,
    /// Transport timeout for a single request.
    pub timeout: Duration,
}

impl CallOptions {
    /// Fixed parameters sent with every request.
    ///
    /// The login token is omitted when the service is not bound to a login.
    pub fn init_params(&self) -> Map<String, Value> {
        let mut init = Map::new();
        init.insert(ID_APPLICATION.to_string(), Value::String(self.app_id.clone()));
        if let Some(login_id) = &self.login_id {
            init.insert(ID_LOGIN.to_string(), Value::String(login_id.clone()));
        }
        init
    }
}

/// Call lifecycle events emitted by web services.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum EventKind {
    Success,
    Failure,
}

/// Abbreviates a login token for log output.
pub fn short_token(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    if prefix.len() < token.len() {
        format!("{prefix}…")
    } else {
        prefix
    }
}
