// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SOAP 1.2 over HTTP for the SkautIS client.
//!
//! [`SoapConnector`] plugs into the web service factory; [`HttpProbe`]
//! backs the maintenance check.

pub mod transport;
pub mod xml;

pub use transport::{HttpProbe, SoapConnector, SoapTransport, endpoint_from_wsdl};
pub use xml::{DecodeError, decode_response, encode_request};
