// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the `Skautis` facade.

mod common;

use std::collections::HashMap;

use serde_json::json;

use skautis::{CallArgs, SessionAdapter};
use skautis_core::RemoteFault;
use skautis_session::SESSION_KEY;
use skautis_session::login_data::{FIELD_DATE_LOGOUT, FIELD_ROLE, FIELD_TOKEN, FIELD_UNIT};
use skautis_test_utils::FixedProbe;
use skautis_test_utils::fixtures::{APP_ID, TOKEN};

use common::{harness, harness_with_probe};

#[test]
fn login_url_with_and_without_backlink() {
    let h = harness();
    let instance = h.registry.get_instance(APP_ID, false, false, false).unwrap();
    let skautis = instance.lock().unwrap();

    assert_eq!(
        skautis.login_url(None),
        format!("https://is.skaut.cz/Login/?appid={APP_ID}")
    );
    assert_eq!(
        skautis.login_url(Some("https://example.org/back?x=1")),
        format!(
            "https://is.skaut.cz/Login/?appid={APP_ID}&ReturnUrl=https%3A%2F%2Fexample.org%2Fback%3Fx%3D1"
        )
    );
    assert_eq!(skautis.login_url(Some("")), skautis.login_url(None));
}

#[test]
fn register_url_uses_test_instance() {
    let h = harness();
    let instance = h.registry.get_instance(APP_ID, true, false, false).unwrap();
    let skautis = instance.lock().unwrap();
    assert_eq!(
        skautis.register_url(Some("https://example.org/")),
        format!(
            "https://test-is.skaut.cz/Login/Registration.aspx?appid={APP_ID}&ReturnUrl=https%3A%2F%2Fexample.org%2F"
        )
    );
}

#[test]
fn logout_url_carries_token_when_logged_in() {
    let h = harness();
    let instance = h.registry.get_instance(APP_ID, false, false, false).unwrap();
    let mut skautis = instance.lock().unwrap();

    assert_eq!(
        skautis.logout_url(),
        format!("https://is.skaut.cz/Login/LogOut.aspx?appid={APP_ID}")
    );

    skautis
        .user_mut()
        .update_login_data(Some(TOKEN.to_string()), None, None, None)
        .unwrap();
    assert_eq!(
        skautis.logout_url(),
        format!("https://is.skaut.cz/Login/LogOut.aspx?appid={APP_ID}&token={TOKEN}")
    );
}

#[test]
fn posted_login_data_is_stored() {
    let h = harness();
    let instance = h.registry.get_instance(APP_ID, false, false, false).unwrap();
    let mut skautis = instance.lock().unwrap();

    let fields: HashMap<String, String> = [
        (FIELD_TOKEN, TOKEN),
        (FIELD_ROLE, "12"),
        (FIELD_UNIT, "not-a-number"),
        (FIELD_DATE_LOGOUT, "1. 2. 2030 13:05:09"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    skautis.set_login_data(&fields).unwrap();

    let user = skautis.user();
    assert_eq!(user.login_id(), Some(TOKEN));
    assert_eq!(user.role_id(), Some(12));
    assert_eq!(user.unit_id(), None);
    assert_eq!(
        user.local_logout_date().unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
        "2030-02-01 13:05:09"
    );
    assert!(!user.is_auth_confirmed());

    let stored = h.session.get(SESSION_KEY).unwrap();
    assert_eq!(stored["ID_Login"], json!(TOKEN));
    assert_eq!(stored["ID_Role"], json!(12));
}

#[test]
fn malformed_posted_date_is_rejected() {
    let h = harness();
    let instance = h.registry.get_instance(APP_ID, false, false, false).unwrap();
    let mut skautis = instance.lock().unwrap();

    let fields = HashMap::from([
        (FIELD_TOKEN.to_string(), TOKEN.to_string()),
        (FIELD_DATE_LOGOUT.to_string(), "2030-02-01".to_string()),
    ]);
    let err = skautis.set_login_data(&fields).unwrap_err();
    assert_eq!(err.kind_name(), "DateParseError");
    assert_eq!(skautis.user().login_id(), None);
}

#[test]
fn services_follow_the_current_token() {
    let h = harness();
    h.transport.respond("UserDetail", json!({"UserDetailResult": {"ID": 1}}));
    let instance = h.registry.get_instance(APP_ID, false, false, false).unwrap();
    let mut skautis = instance.lock().unwrap();

    skautis
        .get_web_service("user")
        .unwrap()
        .call("UserDetail", CallArgs::new())
        .unwrap();
    skautis
        .user_mut()
        .update_login_data(Some(TOKEN.to_string()), None, None, None)
        .unwrap();
    skautis
        .get_web_service("user")
        .unwrap()
        .call("UserDetail", CallArgs::new())
        .unwrap();

    let envelopes: Vec<_> = h.transport.calls().into_iter().map(|(_, e)| e).collect();
    assert_eq!(envelopes.len(), 2);
    assert!(envelopes[0]["userDetailInput"].get("ID_Login").is_none());
    assert_eq!(envelopes[1]["userDetailInput"]["ID_Login"], json!(TOKEN));
}

#[test]
fn unknown_service_is_reported() {
    let h = harness();
    let instance = h.registry.get_instance(APP_ID, false, false, false).unwrap();
    let skautis = instance.lock().unwrap();
    let Err(err) = skautis.get_web_service("Nonexistent") else {
        panic!("Nonexistent should not resolve");
    };
    assert_eq!(err.kind_name(), "ServiceNotFoundError");
}

#[test]
fn debug_log_is_empty_until_enabled() {
    let h = harness();
    h.transport.respond("UserDetail", json!({"UserDetailResult": {}}));
    let instance = h.registry.get_instance(APP_ID, false, false, false).unwrap();
    let skautis = instance.lock().unwrap();

    skautis
        .get_web_service("UserManagement")
        .unwrap()
        .call("UserDetail", CallArgs::new())
        .unwrap();
    assert!(skautis.debug_log().is_empty());
}

#[test]
fn debug_log_records_every_service_once() {
    let h = harness();
    h.transport
        .respond("UserDetail", json!({"UserDetailResult": {"ID": 1}}))
        .fail("UnitDetail", RemoteFault::new("Server", "Nemáte oprávnění"));
    let instance = h.registry.get_instance(APP_ID, false, false, false).unwrap();
    let mut skautis = instance.lock().unwrap();

    let before = skautis.get_web_service("UserManagement").unwrap();
    skautis.enable_debug_log();
    skautis.enable_debug_log();
    let after = skautis.get_web_service("OrganizationUnit").unwrap();

    before.call("UserDetail", CallArgs::new()).unwrap();
    let err = after.call("UnitDetail", CallArgs::new()).unwrap_err();
    assert_eq!(err.kind_name(), "PermissionError");

    let log = skautis.debug_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].function, "UserDetail");
    assert!(!log[0].has_failed());
    assert_eq!(log[0].result, Some(json!({"ID": 1})));
    assert_eq!(log[1].function, "UnitDetail");
    assert!(log[1].has_failed());
    assert_eq!(log[1].error_class(), "PermissionError");
}

#[test]
fn maintenance_follows_probe() {
    let up = harness();
    let instance = up.registry.get_instance(APP_ID, true, false, false).unwrap();
    assert!(!instance.lock().unwrap().is_maintenance());
    assert_eq!(
        up.probe.probed(),
        vec!["https://test-is.skaut.cz/JunakWebservice/UserManagement.asmx?WSDL".to_string()]
    );

    let down = harness_with_probe(FixedProbe::new(503));
    let instance = down.registry.get_instance(APP_ID, false, false, false).unwrap();
    assert!(instance.lock().unwrap().is_maintenance());

    let gone = harness_with_probe(FixedProbe::unreachable());
    let instance = gone.registry.get_instance(APP_ID, false, false, false).unwrap();
    assert!(instance.lock().unwrap().is_maintenance());
}
