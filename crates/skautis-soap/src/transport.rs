// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blocking HTTP transport for SOAP 1.2 calls and the availability probe.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use skautis_core::{CallOptions, Connector, RemoteFault, SkautisError, StatusProbe, Transport};

use crate::xml::{self, DecodeError, SKAUTIS_NAMESPACE};

/// Fault code for failures below the SOAP layer (connection, status, I/O).
pub const HTTP_FAULT: &str = "HTTP";

/// Fault code for responses that are not valid SOAP.
pub const CLIENT_FAULT: &str = "Client";

const USER_AGENT: &str = concat!("skautis-rs/", env!("CARGO_PKG_VERSION"));

/// Service endpoint for a WSDL location: the same URL without its query.
pub fn endpoint_from_wsdl(wsdl_url: &str) -> Result<String, SkautisError> {
    let mut url = Url::parse(wsdl_url)
        .map_err(|e| SkautisError::Config(format!("invalid WSDL url '{wsdl_url}': {e}")))?;
    url.set_query(None);
    Ok(url.into())
}

/// Posts SOAP 1.2 requests to one service endpoint.
#[derive(Debug, Clone)]
pub struct SoapTransport {
    client: Client,
    endpoint: String,
}

impl SoapTransport {
    /// Builds a transport honoring the timeout and compression options.
    pub fn new(wsdl_url: &str, options: &CallOptions) -> Result<Self, SkautisError> {
        if wsdl_url.trim().is_empty() {
            return Err(SkautisError::Config("WSDL address cannot be empty".to_string()));
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.timeout)
            .gzip(options.compression)
            .build()
            .map_err(|e| SkautisError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint_from_wsdl(wsdl_url)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for SoapTransport {
    fn invoke(&self, operation: &str, envelope: &Value) -> Result<Value, RemoteFault> {
        let body = xml::encode_request(operation, envelope);
        let content_type = format!(
            "application/soap+xml; charset=utf-8; action=\"{SKAUTIS_NAMESPACE}{operation}\""
        );

        let started = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .map_err(|e| RemoteFault::new(HTTP_FAULT, format!("request failed: {e}")).with_source(e))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| RemoteFault::new(HTTP_FAULT, format!("failed to read response: {e}")).with_source(e))?;
        debug!(
            endpoint = %self.endpoint,
            operation,
            status = %status,
            bytes = text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "SOAP response received"
        );

        // Faults arrive with a 500 status, so the body is decoded first.
        match xml::decode_response(operation, &text) {
            Ok(value) if status.is_success() => Ok(value),
            Err(DecodeError::Fault(fault)) => Err(fault),
            Ok(_) => Err(RemoteFault::new(HTTP_FAULT, format!("unexpected status {status}"))),
            Err(DecodeError::Malformed(detail)) if !status.is_success() => {
                warn!(status = %status, detail = %detail, "non-SOAP error response");
                Err(RemoteFault::new(HTTP_FAULT, format!("unexpected status {status}")))
            }
            Err(e @ DecodeError::Malformed(_)) => {
                Err(RemoteFault::new(CLIENT_FAULT, e.to_string()).with_source(e))
            }
        }
    }
}

/// Creates a [`SoapTransport`] per service.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoapConnector;

impl Connector for SoapConnector {
    fn connect(
        &self,
        wsdl_url: &str,
        options: &CallOptions,
    ) -> Result<Arc<dyn Transport>, SkautisError> {
        let transport = SoapTransport::new(wsdl_url, options)?;
        debug!(endpoint = transport.endpoint(), compression = options.compression, "SOAP transport ready");
        Ok(Arc::new(transport))
    }
}

/// Availability probe issuing a HEAD request.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, SkautisError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SkautisError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl StatusProbe for HttpProbe {
    fn status(&self, url: &str) -> Result<u16, SkautisError> {
        let response = self
            .client
            .head(url)
            .send()
            .map_err(|e| SkautisError::Internal(format!("probe of {url} failed: {e}")))?;
        Ok(response.status().as_u16())
    }
}
