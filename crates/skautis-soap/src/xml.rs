// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between structured values and SOAP 1.2 documents.
//!
//! Requests: objects become child elements, sequences become repeated
//! elements with the same name, null becomes `xsi:nil="true"`. Responses
//! are decoded the other way round; repeated siblings turn into a sequence
//! and every text leaf is a string.

use std::fmt::Write as _;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};
use thiserror::Error;

use skautis_core::RemoteFault;

/// XML namespace of every SkautIS operation.
pub const SKAUTIS_NAMESPACE: &str = "https://is.skaut.cz/";

const SOAP12_NAMESPACE: &str = "http://www.w3.org/2003/05/soap-envelope";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Key under which an envelope passes its parameters positionally.
const POSITIONAL_WRAPPER: &str = "0";

/// Why a response document could not be turned into a value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("SOAP fault: {0}")]
    Fault(RemoteFault),

    #[error("malformed SOAP response: {0}")]
    Malformed(String),
}

/// Serializes the request document for `operation`.
pub fn encode_request(operation: &str, envelope: &Value) -> String {
    let parameters = match envelope {
        Value::Object(map) if map.len() == 1 && map.contains_key(POSITIONAL_WRAPPER) => {
            &map[POSITIONAL_WRAPPER]
        }
        other => other,
    };

    let mut out = String::with_capacity(512);
    out.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    let _ = write!(
        out,
        r#"<soap12:Envelope xmlns:xsi="{XSI_NAMESPACE}" xmlns:soap12="{SOAP12_NAMESPACE}"><soap12:Body><{operation} xmlns="{SKAUTIS_NAMESPACE}">"#
    );
    if let Value::Object(children) = parameters {
        write_children(&mut out, children);
    }
    let _ = write!(out, "</{operation}></soap12:Body></soap12:Envelope>");
    out
}

fn write_children(out: &mut String, children: &Map<String, Value>) {
    for (name, value) in children {
        write_element(out, name, value);
    }
}

fn write_element(out: &mut String, name: &str, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(out, name, item);
            }
        }
        Value::Null => {
            let _ = write!(out, r#"<{name} xsi:nil="true"/>"#);
        }
        Value::Object(children) => {
            let _ = write!(out, "<{name}>");
            write_children(out, children);
            let _ = write!(out, "</{name}>");
        }
        Value::String(text) => {
            let _ = write!(out, "<{name}>{}</{name}>", escape(text.as_str()));
        }
        Value::Bool(flag) => {
            let _ = write!(out, "<{name}>{flag}</{name}>");
        }
        Value::Number(number) => {
            let _ = write!(out, "<{name}>{number}</{name}>");
        }
    }
}

struct Frame {
    name: String,
    nil: bool,
    text: String,
    children: Vec<(String, Value)>,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Self {
        Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            nil: is_nil(start),
            text: String::new(),
            children: Vec::new(),
        }
    }

    fn close(self) -> (String, Value) {
        let value = if !self.children.is_empty() {
            Value::Object(group_children(self.children))
        } else if self.nil {
            Value::Null
        } else if self.text.trim().is_empty() && is_record_element(&self.name) {
            Value::Object(Map::new())
        } else {
            Value::String(self.text)
        };
        (self.name, value)
    }
}

/// `<Op>Result` and `<Op>Output` always carry records, even when empty.
fn is_record_element(name: &str) -> bool {
    name.ends_with("Result") || name.ends_with("Output")
}

fn is_nil(start: &BytesStart<'_>) -> bool {
    start.attributes().flatten().any(|attr| {
        attr.key.local_name().as_ref() == b"nil" && attr.value.as_ref() == b"true"
    })
}

/// Repeated names collapse into a sequence in document order.
fn group_children(children: Vec<(String, Value)>) -> Map<String, Value> {
    let mut map = Map::new();
    for (name, value) in children {
        match map.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(name, value);
            }
        }
    }
    map
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => name.strip_prefix('#')?.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Parses a whole document into `(root name, value)`.
pub fn parse_document(xml: &str) -> Result<(String, Value), DecodeError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;
        match event {
            Event::Start(start) => stack.push(Frame::open(&start)),
            Event::Empty(start) => {
                let frame = Frame::open(&start);
                let closed = frame.close();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(closed),
                    None => return Ok(closed),
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| DecodeError::Malformed("unbalanced end tag".to_string()))?;
                let closed = frame.close();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(closed),
                    None => return Ok(closed),
                }
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&text));
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::GeneralRef(reference) => {
                let name = String::from_utf8_lossy(&reference).into_owned();
                let resolved = resolve_entity(&name)
                    .ok_or_else(|| DecodeError::Malformed(format!("unknown entity &{name};")))?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push(resolved);
                }
            }
            Event::Eof => {
                return Err(DecodeError::Malformed("document ended early".to_string()));
            }
            _ => {}
        }
    }
}

fn text_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |node, key| node.get(key))
        .and_then(Value::as_str)
}

fn fault_from(fault: &Value) -> RemoteFault {
    let code = text_at(fault, &["Code", "Value"])
        .or_else(|| text_at(fault, &["faultcode"]))
        .unwrap_or("Server");
    let reason = text_at(fault, &["Reason", "Text"])
        .or_else(|| text_at(fault, &["faultstring"]))
        .unwrap_or_default();
    RemoteFault::new(code.trim(), reason.trim())
}

/// Extracts the `<operation>Response` payload, or the fault, from a response.
pub fn decode_response(operation: &str, xml: &str) -> Result<Value, DecodeError> {
    let (root, envelope) = parse_document(xml)?;
    if root != "Envelope" {
        return Err(DecodeError::Malformed(format!(
            "expected a SOAP Envelope, found <{root}>"
        )));
    }
    let body = envelope
        .get("Body")
        .ok_or_else(|| DecodeError::Malformed("envelope has no Body".to_string()))?;

    if let Some(fault) = body.get("Fault") {
        return Err(DecodeError::Fault(fault_from(fault)));
    }

    let response_name = format!("{operation}Response");
    match body {
        Value::Object(map) => Ok(map
            .get(&response_name)
            .or_else(|| map.values().next())
            .cloned()
            .map(|payload| match payload {
                Value::String(text) if text.is_empty() => Value::Object(Map::new()),
                other => other,
            })
            .unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="{SOAP12_NAMESPACE}" xmlns:xsi="{XSI_NAMESPACE}"><soap:Body>{body}</soap:Body></soap:Envelope>"#
        )
    }

    #[test]
    fn request_wraps_parameters_in_operation_element() {
        let envelope = json!({"userDetailInput": {"ID_Application": "app", "ID": 5}});
        let xml = encode_request("UserDetail", &envelope);
        assert!(xml.contains(r#"<UserDetail xmlns="https://is.skaut.cz/">"#));
        assert!(xml.contains("<userDetailInput><ID_Application>app</ID_Application><ID>5</ID></userDetailInput>"));
        assert!(xml.ends_with("</UserDetail></soap12:Body></soap12:Envelope>"));
    }

    #[test]
    fn positional_wrapper_is_dropped() {
        let envelope = json!({"0": {"Wrapper": {"Inner": {"ID": 1}}}});
        let xml = encode_request("Op", &envelope);
        assert!(xml.contains("<Op xmlns=\"https://is.skaut.cz/\"><Wrapper><Inner><ID>1</ID></Inner></Wrapper></Op>"));
    }

    #[test]
    fn request_escapes_text_and_encodes_nil_and_lists() {
        let envelope = json!({"in": {"Note": "a < b & c", "Gone": null, "ID": [1, 2], "On": true}});
        let xml = encode_request("Op", &envelope);
        assert!(xml.contains("<Note>a &lt; b &amp; c</Note>"));
        assert!(xml.contains(r#"<Gone xsi:nil="true"/>"#));
        assert!(xml.contains("<ID>1</ID><ID>2</ID>"));
        assert!(xml.contains("<On>true</On>"));
    }

    #[test]
    fn response_payload_is_decoded() {
        let xml = response(
            r#"<UserDetailResponse xmlns="https://is.skaut.cz/"><UserDetailResult><ID>42</ID><UserName>jan &amp; co</UserName><Note xsi:nil="true"/></UserDetailResult></UserDetailResponse>"#,
        );
        let value = decode_response("UserDetail", &xml).unwrap();
        assert_eq!(
            value,
            json!({"UserDetailResult": {"ID": "42", "UserName": "jan & co", "Note": null}})
        );
    }

    #[test]
    fn empty_result_decodes_to_an_empty_record() {
        let xml = response(
            "<UnitAllResponse><UnitAllResult/></UnitAllResponse>",
        );
        let value = decode_response("UnitAll", &xml).unwrap();
        assert_eq!(value, json!({"UnitAllResult": {}}));

        let xml = response(
            "<UnitAllResponse><UnitAllResult><UnitAllOutput></UnitAllOutput><Note/></UnitAllResult></UnitAllResponse>",
        );
        let value = decode_response("UnitAll", &xml).unwrap();
        assert_eq!(value, json!({"UnitAllResult": {"UnitAllOutput": {}, "Note": ""}}));
    }

    #[test]
    fn repeated_siblings_become_a_sequence() {
        let xml = response(
            "<UnitAllResponse><UnitAllResult><UnitAllOutput><ID>1</ID></UnitAllOutput><UnitAllOutput><ID>2</ID></UnitAllOutput></UnitAllResult></UnitAllResponse>",
        );
        let value = decode_response("UnitAll", &xml).unwrap();
        assert_eq!(
            value["UnitAllResult"]["UnitAllOutput"],
            json!([{"ID": "1"}, {"ID": "2"}])
        );
    }

    #[test]
    fn character_references_are_resolved() {
        let xml = response("<OpResponse><OpResult>&#268;&#x65;</OpResult></OpResponse>");
        assert_eq!(decode_response("Op", &xml).unwrap(), json!({"OpResult": "Če"}));
    }

    #[test]
    fn soap12_fault_is_reported() {
        let xml = response(
            "<soap:Fault><soap:Code><soap:Value>soap:Receiver</soap:Value></soap:Code><soap:Reason><soap:Text xml:lang=\"cs\">Uživatel byl odhlášen</soap:Text></soap:Reason></soap:Fault>",
        );
        match decode_response("Op", &xml) {
            Err(DecodeError::Fault(fault)) => {
                assert_eq!(fault.code, "soap:Receiver");
                assert_eq!(fault.message, "Uživatel byl odhlášen");
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn soap11_fault_is_reported() {
        let xml = response("<Fault><faultcode>soap:Server</faultcode><faultstring>Nemáte oprávnění</faultstring></Fault>");
        let Err(DecodeError::Fault(fault)) = decode_response("Op", &xml) else {
            panic!("expected fault");
        };
        assert_eq!(fault.code, "soap:Server");
        assert_eq!(fault.message, "Nemáte oprávnění");
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            decode_response("Op", "<html><body>Down</body></html>"),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            decode_response("Op", "<a><b></a>"),
            Err(DecodeError::Malformed(_))
        ));
    }
}
