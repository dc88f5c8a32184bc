// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`Skautis`] facade: services, login pages and the current user.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};
use url::form_urlencoded;

use skautis_config::Config;
use skautis_core::{EventKind, Listener, SkautisError, SkautisQuery, WebService, short_token};
use skautis_session::{LoginData, User};
use skautis_wsdl::WsdlManager;

type DebugLog = Arc<Mutex<Vec<SkautisQuery>>>;

/// Entry point for one SkautIS application.
pub struct Skautis {
    manager: Arc<WsdlManager>,
    user: User,
    log: Option<DebugLog>,
}

impl Skautis {
    pub fn new(manager: Arc<WsdlManager>, user: User) -> Self {
        Self {
            manager,
            user,
            log: None,
        }
    }

    pub fn wsdl_manager(&self) -> &Arc<WsdlManager> {
        &self.manager
    }

    pub fn config(&self) -> &Config {
        self.manager.config()
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_mut(&mut self) -> &mut User {
        &mut self.user
    }

    /// Service `name` (or alias) bound to the current user's token.
    pub fn get_web_service(&self, name: &str) -> Result<Arc<dyn WebService>, SkautisError> {
        self.manager.get_web_service(name, self.user.login_id())
    }

    /// Login page; SkautIS sends the user back to `backlink` when given.
    pub fn login_url(&self, backlink: Option<&str>) -> String {
        self.login_page("", &self.app_query(backlink))
    }

    /// Logout page for the current token.
    pub fn logout_url(&self) -> String {
        let mut query = vec![("appid", self.config().app_id())];
        if let Some(token) = self.user.login_id() {
            query.push(("token", token));
        }
        self.login_page("LogOut.aspx", &query)
    }

    /// Registration page for new SkautIS accounts.
    pub fn register_url(&self, backlink: Option<&str>) -> String {
        self.login_page("Registration.aspx", &self.app_query(backlink))
    }

    fn app_query<'a>(&'a self, backlink: Option<&'a str>) -> Vec<(&'a str, &'a str)> {
        let mut query = vec![("appid", self.config().app_id())];
        if let Some(backlink) = backlink.filter(|b| !b.is_empty()) {
            query.push(("ReturnUrl", backlink));
        }
        query
    }

    fn login_page(&self, page: &str, query: &[(&str, &str)]) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query)
            .finish();
        format!("{}{page}?{query}", self.config().login_url_base())
    }

    /// Replaces the login state with the fields SkautIS posted back.
    pub fn set_login_data(&mut self, fields: &HashMap<String, String>) -> Result<(), SkautisError> {
        let data = LoginData::from_posted(fields)?;
        if let Some(token) = data.login_id.as_deref() {
            info!(token = %short_token(token), "login data received");
        }
        self.user.replace_login_data(data)?;
        Ok(())
    }

    /// True while SkautIS is down for maintenance.
    pub fn is_maintenance(&self) -> bool {
        self.manager.is_maintenance()
    }

    /// Starts recording every call made through any service. Calling it
    /// again does nothing.
    pub fn enable_debug_log(&mut self) {
        if self.log.is_some() {
            return;
        }
        let log: DebugLog = Arc::default();
        let sink = log.clone();
        let listener: Listener = Arc::new(move |query: &SkautisQuery| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(query.clone());
        });
        self.manager
            .add_web_service_listener(EventKind::Success, listener.clone());
        self.manager
            .add_web_service_listener(EventKind::Failure, listener);
        self.log = Some(log);
        debug!("debug log enabled");
    }

    /// Calls recorded since [`enable_debug_log`](Self::enable_debug_log).
    pub fn debug_log(&self) -> Vec<SkautisQuery> {
        self.log
            .as_ref()
            .map(|log| log.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Skautis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skautis")
            .field("manager", &self.manager)
            .field("user", &self.user)
            .field("debug_log", &self.log.is_some())
            .finish()
    }
}
