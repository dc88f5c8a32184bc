// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared [`Skautis`] instances, one per application id.
//!
//! The host creates one registry and passes it where needed. It owns the
//! process-lifetime state every instance shares: the connector, the probe,
//! the session adapter and the set of verified login tokens.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::info;

use skautis_config::Config;
use skautis_core::{Connector, SessionAdapter, SkautisError, StatusProbe};
use skautis_session::User;
use skautis_soap::{HttpProbe, SoapConnector};
use skautis_wsdl::{CheckedLogins, StandardFactory, WsdlManager};

use crate::facade::Skautis;

/// Timeout of the maintenance probe used by [`SkautisRegistry::soap`].
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SkautisRegistry {
    connector: Arc<dyn Connector>,
    probe: Arc<dyn StatusProbe>,
    session: Option<Arc<dyn SessionAdapter>>,
    checked: Arc<CheckedLogins>,
    instances: Mutex<HashMap<String, Arc<Mutex<Skautis>>>>,
}

impl SkautisRegistry {
    pub fn new(
        connector: Arc<dyn Connector>,
        probe: Arc<dyn StatusProbe>,
        session: Option<Arc<dyn SessionAdapter>>,
    ) -> Self {
        Self {
            connector,
            probe,
            session,
            checked: Arc::new(CheckedLogins::new()),
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Registry talking SOAP over HTTP.
    pub fn soap(session: Option<Arc<dyn SessionAdapter>>) -> Result<Self, SkautisError> {
        Ok(Self::new(
            Arc::new(SoapConnector),
            Arc::new(HttpProbe::new(PROBE_TIMEOUT)?),
            session,
        ))
    }

    /// The shared instance for `app_id`, created on first use.
    ///
    /// Flags passed for an application that already has an instance are
    /// ignored.
    pub fn get_instance(
        &self,
        app_id: &str,
        test_mode: bool,
        cache: bool,
        compression: bool,
    ) -> Result<Arc<Mutex<Skautis>>, SkautisError> {
        if let Some(existing) = self.lookup(app_id) {
            return Ok(existing);
        }
        let config = Config::new(app_id)?
            .with_test_mode(test_mode)
            .with_cache(cache)
            .with_compression(compression);
        self.instance_for(config)
    }

    /// Like [`get_instance`](Self::get_instance) for a fully built configuration.
    pub fn instance_for(&self, config: Config) -> Result<Arc<Mutex<Skautis>>, SkautisError> {
        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = instances.get(config.app_id()) {
            return Ok(existing.clone());
        }

        let app_id = config.app_id().to_string();
        info!(
            app_id = %app_id,
            test_mode = config.is_test_mode(),
            cache = config.cache(),
            "creating SkautIS instance"
        );
        let instance = Arc::new(Mutex::new(self.build(config)));
        instances.insert(app_id, instance.clone());
        Ok(instance)
    }

    /// A new, unshared instance wired to this registry's collaborators.
    pub fn build(&self, config: Config) -> Skautis {
        let factory = StandardFactory::new(self.connector.clone(), self.checked.clone());
        let manager = Arc::new(WsdlManager::new(config, Arc::new(factory), self.probe.clone()));
        let user = User::new(manager.clone(), self.session.clone());
        Skautis::new(manager, user)
    }

    pub fn checked_logins(&self) -> &Arc<CheckedLogins> {
        &self.checked
    }

    pub fn len(&self) -> usize {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, app_id: &str) -> Option<Arc<Mutex<Skautis>>> {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(app_id)
            .cloned()
    }
}

impl std::fmt::Debug for SkautisRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkautisRegistry")
            .field("instances", &self.len())
            .field("checked_logins", &self.checked.len())
            .field("session", &self.session.is_some())
            .finish()
    }
}
