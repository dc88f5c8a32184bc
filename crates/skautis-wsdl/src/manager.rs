// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lookup, creation and memoization of web services.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};
use url::Url;

use skautis_config::Config;
use skautis_core::{EventKind, Listener, SkautisError, StatusProbe, WebService, short_token};

use crate::factory::WebServiceFactory;

/// Services offered by SkautIS.
pub const SUPPORTED_SERVICES: &[&str] = &[
    "ApplicationManagement",
    "ContentManagement",
    "Evaluation",
    "Events",
    "Exports",
    "GoogleApps",
    "Journal",
    "Material",
    "Message",
    "OrganizationUnit",
    "Power",
    "Reports",
    "Summary",
    "Task",
    "Telephony",
    "UserManagement",
    "Vivant",
    "Welcome",
];

/// Short names accepted in place of a service name.
const ALIASES: &[(&str, &str)] = &[
    ("user", "UserManagement"),
    ("usr", "UserManagement"),
    ("org", "OrganizationUnit"),
    ("app", "ApplicationManagement"),
    ("event", "Events"),
    ("events", "Events"),
];

/// Service probed by [`WsdlManager::is_maintenance`].
const PROBE_SERVICE: &str = "UserManagement";

/// Resolves a service name or alias to its canonical name.
pub fn resolve_service_name(name: &str) -> Result<&'static str, SkautisError> {
    if let Some(canonical) = SUPPORTED_SERVICES.iter().find(|s| **s == name) {
        return Ok(canonical);
    }
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .ok_or_else(|| SkautisError::ServiceNotFound {
            name: name.to_string(),
        })
}

/// Owns every web service created for one configuration.
///
/// At most one service exists per (login, service, mode). Listeners
/// registered here are attached to existing services and to every service
/// created later, in registration order.
pub struct WsdlManager {
    config: Config,
    factory: Arc<dyn WebServiceFactory>,
    probe: Arc<dyn StatusProbe>,
    services: Mutex<HashMap<String, Arc<dyn WebService>>>,
    listeners: Mutex<Vec<(EventKind, Listener)>>,
}

impl WsdlManager {
    pub fn new(
        config: Config,
        factory: Arc<dyn WebServiceFactory>,
        probe: Arc<dyn StatusProbe>,
    ) -> Self {
        Self {
            config,
            factory,
            probe,
            services: Mutex::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the service for `name` (or an alias) bound to `login_id`.
    pub fn get_web_service(
        &self,
        name: &str,
        login_id: Option<&str>,
    ) -> Result<Arc<dyn WebService>, SkautisError> {
        let canonical = resolve_service_name(name)?;
        let key = self.service_key(canonical, login_id);

        // Listener registration takes `services` before `listeners` too.
        let mut services = self.services.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = services.get(&key) {
            return Ok(existing.clone());
        }

        let service = self.create_web_service(canonical, login_id)?;
        services.insert(key, service.clone());
        Ok(service)
    }

    /// Builds a new, unmemoized service with every registered listener attached.
    pub fn create_web_service(
        &self,
        name: &str,
        login_id: Option<&str>,
    ) -> Result<Arc<dyn WebService>, SkautisError> {
        let options = self.config.call_options(login_id);
        let wsdl_url = self.wsdl_url(name)?;
        let service = self.factory.create(name, &wsdl_url, &options)?;

        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for (kind, listener) in listeners.iter() {
            service.subscribe(*kind, listener.clone());
        }
        debug!(
            service = name,
            token = login_id.map(short_token).as_deref().unwrap_or("-"),
            listeners = listeners.len(),
            "web service created"
        );
        Ok(service)
    }

    /// WSDL location of a service, e.g. `.../JunakWebservice/UserManagement.asmx?WSDL`.
    pub fn wsdl_url(&self, name: &str) -> Result<String, SkautisError> {
        let mut url = Url::parse(self.config.base_url())
            .map_err(|e| SkautisError::Internal(format!("invalid base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| SkautisError::Internal("base url cannot have a path".to_string()))?
            .pop_if_empty()
            .push("JunakWebservice")
            .push(&format!("{name}.asmx"));
        url.set_query(Some("WSDL"));
        Ok(url.into())
    }

    /// Subscribes `listener` on all current and future services.
    pub fn add_web_service_listener(&self, kind: EventKind, listener: Listener) {
        let services = self.services.lock().unwrap_or_else(PoisonError::into_inner);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((kind, listener.clone()));
        for service in services.values() {
            service.subscribe(kind, listener.clone());
        }
    }

    pub fn supported_web_services(&self) -> &'static [&'static str] {
        SUPPORTED_SERVICES
    }

    pub fn is_web_service_supported(&self, name: &str) -> bool {
        SUPPORTED_SERVICES.contains(&name)
    }

    /// True unless a probe of the `UserManagement` WSDL answers exactly 200.
    pub fn is_maintenance(&self) -> bool {
        let url = match self.wsdl_url(PROBE_SERVICE) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "cannot build probe url");
                return true;
            }
        };
        match self.probe.status(&url) {
            Ok(200) => false,
            Ok(status) => {
                warn!(status, url = %url, "SkautIS reports unavailable");
                true
            }
            Err(e) => {
                warn!(error = %e, url = %url, "SkautIS probe failed");
                true
            }
        }
    }

    fn service_key(&self, canonical: &str, login_id: Option<&str>) -> String {
        let mode = if self.config.is_test_mode() { "_Test" } else { "" };
        format!("{}_{canonical}{mode}", login_id.unwrap_or_default())
    }
}

impl std::fmt::Debug for WsdlManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsdlManager")
            .field("config", &self.config)
            .field(
                "services",
                &self
                    .services
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .len(),
            )
            .finish_non_exhaustive()
    }
}
