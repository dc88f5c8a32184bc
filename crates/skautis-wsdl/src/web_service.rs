// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The web service that actually talks to SkautIS.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use skautis_core::{
    CallArgs, CallOptions, EventDispatcher, EventKind, Listener, PendingQuery, SkautisError,
    Transport, WebService, short_token,
};

use crate::envelope;

/// One remote SkautIS service (for example `UserManagement`) bound to a login.
pub struct RemoteWebService {
    name: String,
    transport: Arc<dyn Transport>,
    init: Map<String, Value>,
    events: EventDispatcher,
}

impl RemoteWebService {
    /// Creates the service; `options` supply the parameters sent with every call.
    pub fn new(name: impl Into<String>, transport: Arc<dyn Transport>, options: &CallOptions) -> Self {
        Self {
            name: name.into(),
            transport,
            init: options.init_params(),
            events: EventDispatcher::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters merged into every request.
    pub fn init_params(&self) -> &Map<String, Value> {
        &self.init
    }
}

impl std::fmt::Debug for RemoteWebService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = self
            .init
            .get(skautis_core::ID_LOGIN)
            .and_then(Value::as_str)
            .map(short_token);
        f.debug_struct("RemoteWebService")
            .field("name", &self.name)
            .field("token", &token)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl WebService for RemoteWebService {
    fn call(&self, function: &str, args: CallArgs) -> Result<Value, SkautisError> {
        let operation = envelope::operation_name(function);
        let request = envelope::prepare_args(&operation, &self.init, &args);
        let pending = self
            .events
            .has_listeners()
            .then(|| PendingQuery::begin(operation.as_str(), request.clone()));

        debug!(service = %self.name, function = %operation, "calling web service");
        let started = Instant::now();

        match self.transport.invoke(&operation, &request) {
            Ok(raw) => {
                let response = match args.cover {
                    Some(_) => raw,
                    None => envelope::parse_output(&operation, raw),
                };
                debug!(
                    service = %self.name,
                    function = %operation,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "web service call finished"
                );
                if let Some(query) = pending {
                    self.events
                        .dispatch(EventKind::Success, &query.succeeded(&response));
                }
                Ok(response)
            }
            Err(fault) => {
                let error = envelope::classify_fault(fault);
                warn!(
                    service = %self.name,
                    function = %operation,
                    kind = error.kind_name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %error,
                    "web service call failed"
                );
                if let Some(query) = pending {
                    self.events.dispatch(EventKind::Failure, &query.failed(&error));
                }
                Err(error)
            }
        }
    }

    fn subscribe(&self, kind: EventKind, listener: Listener) {
        self.events.subscribe(kind, listener);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use serde_json::json;
    use skautis_core::{RemoteFault, SkautisQuery};
    use skautis_test_utils::MockTransport;
    use tracing_test::traced_test;

    use super::*;

    fn options(login: Option<&str>) -> CallOptions {
        CallOptions {
            app_id: "app".to_string(),
            login_id: login.map(str::to_string),
            compression: false,
            cache: false,
            timeout: Duration::from_secs(30),
        }
    }

    fn service(transport: &Arc<MockTransport>) -> RemoteWebService {
        RemoteWebService::new("UserManagement", transport.clone(), &options(Some("token")))
    }

    #[test]
    fn call_sends_capitalized_operation_with_init_params() {
        let transport = Arc::new(MockTransport::new());
        transport.respond("UserDetail", json!({"UserDetailResult": {"ID": 7}}));

        let result = service(&transport)
            .call("userDetail", CallArgs::new().with("ID", 7))
            .unwrap();

        assert_eq!(result, json!({"ID": 7}));
        assert_eq!(
            transport.last_envelope("UserDetail").unwrap(),
            json!({"userDetailInput": {"ID_Application": "app", "ID_Login": "token", "ID": 7}})
        );
    }

    #[test]
    fn unbound_service_omits_login() {
        let transport = Arc::new(MockTransport::new());
        transport.respond("Ping", json!({}));
        RemoteWebService::new("Welcome", transport.clone(), &options(None))
            .call("ping", CallArgs::new())
            .unwrap();
        assert_eq!(
            transport.last_envelope("Ping").unwrap(),
            json!({"pingInput": {"ID_Application": "app"}})
        );
    }

    #[test]
    fn covered_call_returns_raw_response() {
        let transport = Arc::new(MockTransport::new());
        let raw = json!({"FooResult": {"FooOutput": {"ID": 1}}});
        transport.respond("Foo", raw.clone());

        let result = service(&transport)
            .call("foo", CallArgs::new().covered("A/B"))
            .unwrap();

        assert_eq!(result, raw);
        assert!(transport.last_envelope("Foo").unwrap()["0"]["A"]["B"].is_object());
    }

    #[test]
    fn logged_out_fault_is_authentication_error() {
        let transport = Arc::new(MockTransport::new());
        transport.fail("UserDetail", RemoteFault::new("soap:Server", "Uživatel byl odhlášen"));

        let error = service(&transport)
            .call("UserDetail", CallArgs::new())
            .unwrap_err();

        assert!(matches!(error, SkautisError::Authentication { .. }));
        assert_eq!(error.fault().unwrap().code, "soap:Server");
    }

    #[test]
    fn listeners_receive_completed_records_in_order() {
        let transport = Arc::new(MockTransport::new());
        transport
            .respond_once("Ok", json!({"OkResult": 1}))
            .fail_once("Bad", RemoteFault::new("Server", "boom"));
        let service = service(&transport);

        let seen: Arc<Mutex<Vec<(String, SkautisQuery)>>> = Arc::default();
        for (kind, tag) in [
            (EventKind::Success, "first"),
            (EventKind::Success, "second"),
            (EventKind::Failure, "failure"),
        ] {
            let seen = seen.clone();
            service.subscribe(
                kind,
                Arc::new(move |query: &SkautisQuery| {
                    seen.lock().unwrap().push((tag.to_string(), query.clone()));
                }),
            );
        }

        assert_eq!(service.call("ok", CallArgs::new()).unwrap(), json!(1));
        assert!(service.call("bad", CallArgs::new()).is_err());

        let seen = seen.lock().unwrap();
        let tags: Vec<&str> = seen.iter().map(|(tag, _)| tag.as_str()).collect();
        assert_eq!(tags, ["first", "second", "failure"]);
        assert_eq!(seen[0].1.function, "Ok");
        assert_eq!(seen[0].1.result, Some(json!(1)));
        assert!(seen[2].1.has_failed());
        assert_eq!(seen[2].1.error_class(), "ProtocolError");
    }

    #[test]
    fn failure_listener_does_not_change_outcome() {
        let transport = Arc::new(MockTransport::new());
        transport.fail("Bad", RemoteFault::new("Server", "boom"));
        let service = service(&transport);
        service.subscribe(EventKind::Failure, Arc::new(|_: &SkautisQuery| {}));

        let error = service.call("bad", CallArgs::new()).unwrap_err();
        assert!(matches!(error, SkautisError::Protocol { .. }));
    }

    #[traced_test]
    #[test]
    fn failures_are_logged_with_kind() {
        let transport = Arc::new(MockTransport::new());
        transport.fail("Secret", RemoteFault::new("Server", "Nemáte oprávnění"));
        let _ = service(&transport).call("secret", CallArgs::new());
        assert!(logs_contain("web service call failed"));
        assert!(logs_contain("PermissionError"));
    }
}
