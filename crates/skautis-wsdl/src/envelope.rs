// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request envelopes, response unwrapping and fault classification.
//!
//! SkautIS operations take a single `<operation>Input` parameter and answer
//! with `<Operation>Result`, which for list-returning operations holds one
//! or more `<Operation>Output` records.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use skautis_core::{CallArgs, RemoteFault, SkautisError};

/// Key of the positional parameter wrapper in covered envelopes.
pub const POSITIONAL_WRAPPER: &str = "0";

static LOGGED_OUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Uživatel byl odhlášen|user was logged out").unwrap());

static NO_PERMISSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Nemáte oprávnění|insufficient permission").unwrap());

/// Remote operation name: the function name with its first letter capitalized.
pub fn operation_name(function: &str) -> String {
    let mut chars = function.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn input_key(operation: &str) -> String {
    let mut chars = operation.chars();
    let head: String = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{head}Input")
}

fn single(key: impl Into<String>, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.into(), value);
    Value::Object(map)
}

/// Builds the envelope for `operation`.
///
/// `init` goes in first and the caller's data overrides it key by key.
/// Without a cover path the body becomes `{<operation>Input: body}`; with
/// `"A/B"` it becomes `{"0": {"A": {"B": body}}}`.
pub fn prepare_args(operation: &str, init: &Map<String, Value>, args: &CallArgs) -> Value {
    let mut body = init.clone();
    for (key, value) in &args.data {
        body.insert(key.clone(), value.clone());
    }

    match args.cover.as_deref() {
        None => single(input_key(operation), Value::Object(body)),
        Some(path) => {
            let nested = path
                .split('/')
                .rev()
                .fold(Value::Object(body), |inner, segment| single(segment, inner));
            single(POSITIONAL_WRAPPER, nested)
        }
    }
}

/// Moves `key` out of an object, or hands the value back untouched when
/// the key is absent or null.
fn take_field(value: Value, key: &str) -> Result<Value, Value> {
    let present = value.get(key).is_some_and(|field| !field.is_null());
    match value {
        Value::Object(mut map) if present => Ok(map.remove(key).unwrap_or(Value::Null)),
        other => Err(other),
    }
}

/// Unwraps `<Op>Result` / `<Op>Output` from a raw response.
///
/// A single output record is returned as a one-element sequence so callers
/// can always iterate list results.
pub fn parse_output(operation: &str, response: Value) -> Value {
    let result = match take_field(response, &format!("{operation}Result")) {
        Ok(result) => result,
        Err(raw) => return raw,
    };
    match take_field(result, &format!("{operation}Output")) {
        Ok(output @ Value::Object(_)) => Value::Array(vec![output]),
        Ok(output) => output,
        Err(result) => result,
    }
}

/// Maps a remote fault onto the error taxonomy by its message.
pub fn classify_fault(fault: RemoteFault) -> SkautisError {
    if LOGGED_OUT.is_match(&fault.message) {
        SkautisError::Authentication { fault }
    } else if NO_PERMISSION.is_match(&fault.message) {
        SkautisError::Permission { fault }
    } else {
        SkautisError::Protocol { fault }
    }
}
