// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login lifecycle of the current user.
//!
//! States: logged out (no token), logged in but unconfirmed, and logged in
//! with the session confirmed by a remote refresh. Every change is written
//! back to the session adapter.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use tracing::{debug, info, warn};

use skautis_core::{CallArgs, SessionAdapter, SkautisError, short_token};
use skautis_wsdl::WsdlManager;

use crate::login_data::{LoginData, SESSION_KEY, parse_refresh_timestamp};

/// Service and operation that extend the remote session.
const REFRESH_SERVICE: &str = "UserManagement";
const REFRESH_FUNCTION: &str = "LoginUpdateRefresh";

/// The logged-in (or not) user of this session.
pub struct User {
    manager: Arc<WsdlManager>,
    session: Option<Arc<dyn SessionAdapter>>,
    data: LoginData,
}

impl User {
    /// Restores login state from `session` when it holds a record.
    pub fn new(manager: Arc<WsdlManager>, session: Option<Arc<dyn SessionAdapter>>) -> Self {
        let data = session
            .as_ref()
            .filter(|session| session.has(SESSION_KEY))
            .and_then(|session| session.get(SESSION_KEY))
            .and_then(|stored| match serde_json::from_value::<LoginData>(stored) {
                Ok(data) => Some(data),
                Err(e) => {
                    warn!(error = %e, "discarding unreadable login record");
                    None
                }
            })
            .unwrap_or_default();
        Self {
            manager,
            session,
            data,
        }
    }

    pub fn login_id(&self) -> Option<&str> {
        self.data.login_id.as_deref()
    }

    pub fn role_id(&self) -> Option<i64> {
        self.data.role_id
    }

    pub fn unit_id(&self) -> Option<i64> {
        self.data.unit_id
    }

    /// Time of the automatic remote logout.
    pub fn logout_date(&self) -> Option<DateTime<Utc>> {
        self.data.logout_date
    }

    /// Time of the automatic remote logout, Prague local time.
    pub fn local_logout_date(&self) -> Option<DateTime<Tz>> {
        self.data.local_logout_date()
    }

    pub fn login_data(&self) -> &LoginData {
        &self.data
    }

    /// Was the session confirmed by the last remote refresh?
    pub fn is_auth_confirmed(&self) -> bool {
        self.data.auth_confirmed
    }

    /// Replaces the whole login state.
    pub fn set_login_data(
        &mut self,
        login_id: Option<String>,
        role_id: Option<i64>,
        unit_id: Option<i64>,
        logout_date: Option<DateTime<Utc>>,
    ) -> Result<&mut Self, SkautisError> {
        self.data = LoginData::default();
        self.update_login_data(login_id, role_id, unit_id, logout_date)
    }

    /// Overwrites only the fields given; the rest is kept.
    pub fn update_login_data(
        &mut self,
        login_id: Option<String>,
        role_id: Option<i64>,
        unit_id: Option<i64>,
        logout_date: Option<DateTime<Utc>>,
    ) -> Result<&mut Self, SkautisError> {
        if let Some(login_id) = login_id {
            self.data.login_id = Some(login_id);
        }
        if let Some(role_id) = role_id {
            self.data.role_id = Some(role_id);
        }
        if let Some(unit_id) = unit_id {
            self.data.unit_id = Some(unit_id);
        }
        if let Some(logout_date) = logout_date {
            self.data.logout_date = Some(logout_date);
        }
        self.save()?;
        Ok(self)
    }

    /// Replaces the login state with an already parsed record.
    pub fn replace_login_data(&mut self, data: LoginData) -> Result<&mut Self, SkautisError> {
        self.set_login_data(data.login_id, data.role_id, data.unit_id, data.logout_date)
    }

    /// Forgets everything; used on logout.
    pub fn reset_login_data(&mut self) -> Result<&mut Self, SkautisError> {
        if let Some(token) = self.login_id() {
            info!(token = %short_token(token), "login data reset");
        }
        self.set_login_data(None, None, None, None)
    }

    /// Is the user logged in with a session that has not expired?
    ///
    /// Without a token this answers `false` without contacting SkautIS.
    /// Otherwise the session is confirmed remotely when `hard_check` is set
    /// or it has not been confirmed yet. A failed remote refresh only
    /// downgrades the session; a malformed refresh timestamp is an error.
    pub fn is_logged_in(&mut self, hard_check: bool) -> Result<bool, SkautisError> {
        if self.login_id().is_none_or(str::is_empty) {
            return Ok(false);
        }
        if hard_check || !self.is_auth_confirmed() {
            self.confirm_auth()?;
        }
        Ok(self.is_auth_confirmed()
            && self
                .data
                .logout_date
                .is_some_and(|logout| logout > Utc::now()))
    }

    fn confirm_auth(&mut self) -> Result<(), SkautisError> {
        match self.update_logout_time().map(|_| ()) {
            Ok(_) => self.set_auth_confirmed(true),
            Err(e) if e.fault().is_some() => {
                warn!(
                    token = %self.login_id().map(short_token).unwrap_or_default(),
                    kind = e.kind_name(),
                    error = %e,
                    "login confirmation failed"
                );
                self.set_auth_confirmed(false)
            }
            Err(e) => {
                self.set_auth_confirmed(false)?;
                Err(e)
            }
        }
    }

    fn set_auth_confirmed(&mut self, confirmed: bool) -> Result<(), SkautisError> {
        self.data.auth_confirmed = confirmed;
        self.save()
    }

    /// Extends the remote session and stores the new logout time.
    ///
    /// Does nothing when no one is logged in.
    pub fn update_logout_time(&mut self) -> Result<&mut Self, SkautisError> {
        let Some(login_id) = self.data.login_id.clone() else {
            return Ok(self);
        };

        let service = self
            .manager
            .get_web_service(REFRESH_SERVICE, Some(&login_id))?;
        let result = service.call(
            REFRESH_FUNCTION,
            CallArgs::new().with("ID", login_id.as_str()),
        )?;
        let raw = result
            .get("DateLogout")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let logout_date = parse_refresh_timestamp(raw)?;

        debug!(token = %short_token(&login_id), logout = %logout_date, "session extended");
        self.data.logout_date = Some(logout_date);
        self.save()?;
        Ok(self)
    }

    fn save(&self) -> Result<(), SkautisError> {
        let Some(session) = &self.session else {
            return Ok(());
        };
        let record = serde_json::to_value(&self.data)
            .map_err(|e| SkautisError::Session(format!("cannot encode login data: {e}")))?;
        session.set(SESSION_KEY, record)
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("token", &self.login_id().map(short_token))
            .field("role_id", &self.data.role_id)
            .field("unit_id", &self.data.unit_id)
            .field("logout_date", &self.data.logout_date)
            .field("auth_confirmed", &self.data.auth_confirmed)
            .finish_non_exhaustive()
    }
}
