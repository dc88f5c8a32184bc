// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response caching in front of a web service.
//!
//! The first call made for a login token always reaches the remote service,
//! so every session gets at least one verified round trip before cached
//! data is trusted. After that, identical calls are answered from the cache.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use skautis_core::{CallArgs, EventKind, Listener, SkautisError, WebService, short_token};

/// Operations that must always reach SkautIS; refreshing a session is never
/// answered from the cache.
pub const UNCACHED_FUNCTIONS: &[&str] = &["LoginUpdateRefresh"];

/// Storage for cached responses.
pub trait CacheBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
}

/// Cache kept in memory for the lifetime of the owning service.
#[derive(Debug, Default)]
pub struct ArrayCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl ArrayCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheBackend for ArrayCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}

/// Login tokens that have completed at least one successful remote call.
///
/// Shared by every decorator built from the same registry. Entries are never
/// removed.
#[derive(Debug, Default)]
pub struct CheckedLogins {
    ids: Mutex<HashSet<String>>,
}

impl CheckedLogins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, login_id: &str) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(login_id)
    }

    pub fn mark(&self, login_id: &str) {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(login_id.to_string());
    }

    pub fn len(&self) -> usize {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Web service decorator answering repeated calls from a cache.
pub struct CacheDecorator {
    inner: Arc<dyn WebService>,
    cache: Box<dyn CacheBackend>,
    checked: Arc<CheckedLogins>,
    login_id: Option<String>,
}

impl CacheDecorator {
    /// Wraps `inner`; `login_id` is the token the service was created for.
    pub fn new(
        inner: Arc<dyn WebService>,
        cache: Box<dyn CacheBackend>,
        checked: Arc<CheckedLogins>,
        login_id: Option<String>,
    ) -> Self {
        Self {
            inner,
            cache,
            checked,
            login_id,
        }
    }

    /// Cache key: SHA-256 of the function name and canonical arguments.
    pub fn call_key(function: &str, args: &CallArgs) -> String {
        let mut hasher = Sha256::new();
        hasher.update(function.as_bytes());
        hasher.update(b"?");
        hasher.update(args.canonical().as_bytes());
        hex::encode(hasher.finalize())
    }

    fn call_through(&self, function: &str, args: CallArgs, key: &str) -> Result<Value, SkautisError> {
        let response = self.inner.call(function, args)?;
        if !response.is_null() {
            self.cache.set(key, response.clone());
        }
        Ok(response)
    }
}

impl WebService for CacheDecorator {
    fn call(&self, function: &str, args: CallArgs) -> Result<Value, SkautisError> {
        if is_uncached(function) {
            debug!(function, "uncached operation");
            return self.inner.call(function, args);
        }

        let key = Self::call_key(function, &args);
        let token = args
            .login_id()
            .map(str::to_string)
            .or_else(|| self.login_id.clone());

        if let Some(token) = token.filter(|token| !self.checked.contains(token)) {
            let response = self.call_through(function, args, &key)?;
            self.checked.mark(&token);
            debug!(token = %short_token(&token), function, "login token verified");
            return Ok(response);
        }

        if let Some(hit) = self.cache.get(&key) {
            debug!(function, "cache hit");
            return Ok(hit);
        }
        debug!(function, "cache miss");
        self.call_through(function, args, &key)
    }

    fn subscribe(&self, kind: EventKind, listener: Listener) {
        self.inner.subscribe(kind, listener);
    }
}

fn is_uncached(function: &str) -> bool {
    UNCACHED_FUNCTIONS
        .iter()
        .any(|name| name.eq_ignore_ascii_case(function))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use skautis_core::SkautisQuery;
    use skautis_config::Config;
    use skautis_test_utils::{MockTransport, MockWebService};

    use crate::web_service::RemoteWebService;

    use super::*;

    fn decorate(inner: &Arc<MockWebService>, checked: &Arc<CheckedLogins>, login: Option<&str>) -> CacheDecorator {
        CacheDecorator::new(
            inner.clone(),
            Box::new(ArrayCache::new()),
            checked.clone(),
            login.map(str::to_string),
        )
    }

    #[test]
    fn repeated_call_after_check_hits_cache() {
        let inner = Arc::new(MockWebService::new());
        let checked = Arc::new(CheckedLogins::new());
        let service = decorate(&inner, &checked, Some("token"));
        let args = CallArgs::new().with("ID", 1);

        let first = service.call("UnitDetail", args.clone()).unwrap();
        let second = service.call("UnitDetail", args.clone()).unwrap();
        let third = service.call("UnitDetail", args).unwrap();

        assert_eq!(inner.call_count(), 1);
        assert_eq!(first, second);
        assert_eq!(second, third);
        assert!(checked.contains("token"));
    }

    #[test]
    fn first_call_for_new_token_bypasses_cache() {
        let inner = Arc::new(MockWebService::new());
        let checked = Arc::new(CheckedLogins::new());
        let service = decorate(&inner, &checked, None);

        let args = |token: &str| CallArgs::new().with("ID_Login", token).with("ID", 1);
        service.call("UnitDetail", args("a")).unwrap();
        service.call("UnitDetail", args("a")).unwrap();
        assert_eq!(inner.call_count(), 1);

        service.call("UnitDetail", args("b")).unwrap();
        assert_eq!(inner.call_count(), 2);
        assert_eq!(checked.len(), 2);
    }

    #[test]
    fn checked_token_from_another_decorator_uses_cache_path() {
        let inner = Arc::new(MockWebService::new());
        let checked = Arc::new(CheckedLogins::new());
        checked.mark("token");
        let service = decorate(&inner, &checked, Some("token"));

        service.call("UnitDetail", CallArgs::new()).unwrap();
        service.call("UnitDetail", CallArgs::new()).unwrap();
        assert_eq!(inner.call_count(), 1);
    }

    #[test]
    fn failed_first_call_leaves_token_unchecked() {
        let inner = Arc::new(MockWebService::new());
        inner.fail("UnitDetail", "boom");
        let checked = Arc::new(CheckedLogins::new());
        let service = decorate(&inner, &checked, Some("token"));

        assert!(service.call("UnitDetail", CallArgs::new()).is_err());
        assert!(!checked.contains("token"));

        inner.recover("UnitDetail");
        service.call("UnitDetail", CallArgs::new()).unwrap();
        assert!(checked.contains("token"));
        assert_eq!(inner.call_count(), 2);
    }

    #[test]
    fn distinct_arguments_are_cached_separately() {
        let inner = Arc::new(MockWebService::new());
        let service = decorate(&inner, &Arc::new(CheckedLogins::new()), None);

        let one = service.call("UnitDetail", CallArgs::new().with("ID", 1)).unwrap();
        let two = service.call("UnitDetail", CallArgs::new().with("ID", 2)).unwrap();
        assert_ne!(one, two);
        assert_eq!(
            service.call("UnitDetail", CallArgs::new().with("ID", 1)).unwrap(),
            one
        );
        assert_eq!(inner.call_count(), 2);
    }

    #[test]
    fn session_refresh_is_never_cached() {
        let inner = Arc::new(MockWebService::new());
        let checked = Arc::new(CheckedLogins::new());
        checked.mark("token");
        let service = decorate(&inner, &checked, Some("token"));
        let args = CallArgs::new().with("ID", "token");

        let first = service.call("LoginUpdateRefresh", args.clone()).unwrap();
        let second = service.call("loginUpdateRefresh", args).unwrap();
        assert_ne!(first, second);
        assert_eq!(inner.call_count(), 2);
    }

    #[test]
    fn null_responses_are_not_cached() {
        let transport = Arc::new(MockTransport::new());
        transport.respond("UnitDetail", Value::Null);
        let remote = Arc::new(RemoteWebService::new(
            "OrganizationUnit",
            transport.clone(),
            &Config::new("app").unwrap().call_options(None),
        ));
        let service = CacheDecorator::new(
            remote,
            Box::new(ArrayCache::new()),
            Arc::new(CheckedLogins::new()),
            None,
        );

        assert_eq!(service.call("UnitDetail", CallArgs::new()).unwrap(), Value::Null);
        assert_eq!(service.call("UnitDetail", CallArgs::new()).unwrap(), Value::Null);
        assert_eq!(transport.call_count("UnitDetail"), 2);
    }

    #[test]
    fn call_key_ignores_key_order() {
        let a = CallArgs::new().with("A", 1).with("B", json!({"x": 1, "y": 2}));
        let b = CallArgs::new().with("B", json!({"y": 2, "x": 1})).with("A", 1);
        assert_eq!(CacheDecorator::call_key("F", &a), CacheDecorator::call_key("F", &b));
        assert_ne!(CacheDecorator::call_key("F", &a), CacheDecorator::call_key("G", &a));
        assert_ne!(
            CacheDecorator::call_key("F", &a),
            CacheDecorator::call_key("F", &a.clone().covered("X"))
        );
    }

    #[test]
    fn subscribe_reaches_wrapped_service() {
        let inner = Arc::new(MockWebService::new());
        let service = decorate(&inner, &Arc::new(CheckedLogins::new()), None);
        service.subscribe(EventKind::Failure, Arc::new(|_: &SkautisQuery| {}));
        assert_eq!(inner.subscriptions(), vec![EventKind::Failure]);
    }
}
