// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP-level tests for the SOAP transport against a local mock server.
//!
//! The blocking client must not run on a runtime worker, so every call is
//! moved to `spawn_blocking`.

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skautis_core::{CallOptions, RemoteFault, StatusProbe, Transport};
use skautis_soap::{HttpProbe, SoapTransport};

fn options() -> CallOptions {
    CallOptions {
        app_id: "app".to_string(),
        login_id: Some("token".to_string()),
        compression: true,
        cache: false,
        timeout: Duration::from_secs(5),
    }
}

fn soap_body(inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope"><soap:Body>{inner}</soap:Body></soap:Envelope>"#
    )
}

async fn invoke(server: &MockServer, operation: &'static str, envelope: Value) -> Result<Value, RemoteFault> {
    let wsdl = format!("{}/JunakWebservice/UserManagement.asmx?WSDL", server.uri());
    tokio::task::spawn_blocking(move || {
        let transport = SoapTransport::new(&wsdl, &options()).expect("transport");
        transport.invoke(operation, &envelope)
    })
    .await
    .expect("blocking task")
}

#[tokio::test(flavor = "multi_thread")]
async fn successful_call_posts_soap12_and_decodes_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/JunakWebservice/UserManagement.asmx"))
        .and(header(
            "content-type",
            "application/soap+xml; charset=utf-8; action=\"https://is.skaut.cz/UserDetail\"",
        ))
        .and(body_string_contains("<ID_Login>token</ID_Login>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soap_body(
            "<UserDetailResponse><UserDetailResult><ID>7</ID></UserDetailResult></UserDetailResponse>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = json!({"userDetailInput": {"ID_Application": "app", "ID_Login": "token"}});
    let value = invoke(&server, "UserDetail", envelope).await.unwrap();
    assert_eq!(value, json!({"UserDetailResult": {"ID": "7"}}));
}

#[tokio::test(flavor = "multi_thread")]
async fn soap_fault_becomes_remote_fault() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(soap_body(
            "<soap:Fault><soap:Code><soap:Value>soap:Receiver</soap:Value></soap:Code><soap:Reason><soap:Text>Uživatel byl odhlášen</soap:Text></soap:Reason></soap:Fault>",
        )))
        .mount(&server)
        .await;

    let fault = invoke(&server, "UserDetail", json!({})).await.unwrap_err();
    assert_eq!(fault.code, "soap:Receiver");
    assert_eq!(fault.message, "Uživatel byl odhlášen");
}

#[tokio::test(flavor = "multi_thread")]
async fn non_soap_error_page_is_http_fault() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let fault = invoke(&server, "UserDetail", json!({})).await.unwrap_err();
    assert_eq!(fault.code, "HTTP");
    assert!(fault.message.contains("503"));
}

#[tokio::test(flavor = "multi_thread")]
async fn garbage_success_body_is_client_fault() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not xml at all <"))
        .mount(&server)
        .await;

    let fault = invoke(&server, "UserDetail", json!({})).await.unwrap_err();
    assert_eq!(fault.code, "Client");
}

#[tokio::test(flavor = "multi_thread")]
async fn probe_reports_status_code() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let base = server.uri();
    let (up, down) = tokio::task::spawn_blocking(move || {
        let probe = HttpProbe::new(Duration::from_secs(5)).expect("probe");
        (
            probe.status(&format!("{base}/up")).unwrap(),
            probe.status(&format!("{base}/down")).unwrap(),
        )
    })
    .await
    .unwrap();
    assert_eq!(up, 200);
    assert_eq!(down, 503);
}
