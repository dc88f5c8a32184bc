// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction of web services and their decorators.

use std::sync::Arc;

use tracing::debug;

use skautis_core::{CallOptions, Connector, SkautisError, WebService};

use crate::cache::{ArrayCache, CacheDecorator, CheckedLogins};
use crate::web_service::RemoteWebService;

/// Builds ready-to-use web services for the manager.
pub trait WebServiceFactory: Send + Sync {
    fn create(
        &self,
        name: &str,
        wsdl_url: &str,
        options: &CallOptions,
    ) -> Result<Arc<dyn WebService>, SkautisError>;
}

/// Connects a [`RemoteWebService`] and, when caching is on, wraps it in a
/// [`CacheDecorator`] sharing the registry's checked-login set.
pub struct StandardFactory {
    connector: Arc<dyn Connector>,
    checked: Arc<CheckedLogins>,
}

impl StandardFactory {
    pub fn new(connector: Arc<dyn Connector>, checked: Arc<CheckedLogins>) -> Self {
        Self { connector, checked }
    }
}

impl WebServiceFactory for StandardFactory {
    fn create(
        &self,
        name: &str,
        wsdl_url: &str,
        options: &CallOptions,
    ) -> Result<Arc<dyn WebService>, SkautisError> {
        let transport = self.connector.connect(wsdl_url, options)?;
        let service: Arc<dyn WebService> = Arc::new(RemoteWebService::new(name, transport, options));
        if !options.cache {
            return Ok(service);
        }

        debug!(service = name, "enabling response cache");
        Ok(Arc::new(CacheDecorator::new(
            service,
            Box::new(ArrayCache::new()),
            self.checked.clone(),
            options.login_id.clone(),
        )))
    }
}
