// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging users into a host application with their SkautIS account.
//!
//! After SkautIS posts the login fields back, [`ExternalAuth::login`]
//! confirms the session remotely, reads the user's profile and makes sure a
//! matching local account exists.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::RngCore;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use skautis_config::AuthConfig;
use skautis_core::{CallArgs, IdentityStore, NewUser, SkautisError, UserChanges, short_token};
use skautis_session::LoginData;

use crate::facade::Skautis;

/// Outcome of a failed external login.
///
/// `BadCredentials` and `BadRemoteSession` are shown to users as two
/// different messages.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("SkautIS login data is missing or invalid")]
    BadCredentials,

    #[error("SkautIS session is not valid, please log in again")]
    BadRemoteSession,

    #[error(transparent)]
    Backend(SkautisError),
}

impl AuthError {
    fn from_remote(error: SkautisError) -> Self {
        match error {
            SkautisError::Authentication { .. } => AuthError::BadRemoteSession,
            other => AuthError::Backend(other),
        }
    }
}

/// A user authenticated through SkautIS and mapped onto a local account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub login: String,
    pub display_name: String,
    pub email: String,
    pub groups: Vec<String>,
    /// The local account was created by this login.
    pub created: bool,
}

struct Profile {
    login: String,
    display_name: String,
    email: String,
}

/// Bridges SkautIS sessions and a local identity store.
pub struct ExternalAuth {
    skautis: Arc<Mutex<Skautis>>,
    store: Arc<dyn IdentityStore>,
    settings: AuthConfig,
}

impl ExternalAuth {
    pub fn new(skautis: Arc<Mutex<Skautis>>, store: Arc<dyn IdentityStore>, settings: AuthConfig) -> Self {
        Self {
            skautis,
            store,
            settings,
        }
    }

    fn skautis(&self) -> MutexGuard<'_, Skautis> {
        self.skautis.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Logs in with the fields SkautIS posted back.
    pub fn login(&self, fields: &HashMap<String, String>) -> Result<AuthenticatedUser, AuthError> {
        let data = LoginData::from_posted(fields).map_err(|e| {
            warn!(error = %e, "rejecting posted login fields");
            AuthError::BadCredentials
        })?;
        if data.login_id.as_deref().is_none_or(str::is_empty) {
            return Err(AuthError::BadCredentials);
        }

        let mut skautis = self.skautis();
        skautis
            .user_mut()
            .replace_login_data(data)
            .map_err(AuthError::Backend)?;
        if !skautis.user_mut().is_logged_in(true).map_err(AuthError::Backend)? {
            warn!("remote session could not be confirmed");
            return Err(AuthError::BadRemoteSession);
        }

        let profile = self.fetch_profile(&skautis)?;
        drop(skautis);
        self.sync_account(profile)
    }

    /// Forgets the SkautIS session.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.skautis()
            .user_mut()
            .reset_login_data()
            .map_err(AuthError::Backend)?;
        Ok(())
    }

    /// Is the stored SkautIS session still valid? Confirms remotely only
    /// when it has not been confirmed yet.
    pub fn check(&self) -> Result<bool, AuthError> {
        self.skautis()
            .user_mut()
            .is_logged_in(false)
            .map_err(AuthError::Backend)
    }

    fn fetch_profile(&self, skautis: &Skautis) -> Result<Profile, AuthError> {
        let user = skautis
            .get_web_service("UserManagement")
            .and_then(|service| service.call("UserDetail", CallArgs::new()))
            .map_err(AuthError::from_remote)?;

        let login = text(&user, "UserName").ok_or_else(|| {
            AuthError::Backend(SkautisError::Internal(
                "UserDetail returned no UserName".to_string(),
            ))
        })?;

        let person = match user.get("ID_Person").filter(|id| !id.is_null()) {
            Some(person_id) => skautis
                .get_web_service("OrganizationUnit")
                .and_then(|service| {
                    service.call("PersonDetail", CallArgs::new().with("ID", person_id.clone()))
                })
                .map_err(AuthError::from_remote)?,
            None => Value::Null,
        };

        let display_name = text(&person, "DisplayName")
            .or_else(|| self.settings.display_name_fallback.then(|| login.clone()))
            .unwrap_or_default();
        Ok(Profile {
            display_name,
            email: text(&person, "Email").unwrap_or_default(),
            login,
        })
    }

    fn sync_account(&self, profile: Profile) -> Result<AuthenticatedUser, AuthError> {
        let existing = self
            .store
            .find_user(&profile.login)
            .map_err(AuthError::Backend)?;

        let Some(local) = existing else {
            let groups = self.settings.default_groups.clone();
            self.store
                .create_user(NewUser {
                    login: profile.login.clone(),
                    secret: random_secret(),
                    display_name: profile.display_name.clone(),
                    email: profile.email.clone(),
                    groups: groups.clone(),
                })
                .map_err(AuthError::Backend)?;
            info!(login = %profile.login, "local account created");
            return Ok(AuthenticatedUser {
                login: profile.login,
                display_name: profile.display_name,
                email: profile.email,
                groups,
                created: true,
            });
        };

        let changes = UserChanges {
            display_name: (local.display_name != profile.display_name)
                .then(|| profile.display_name.clone()),
            email: (local.email != profile.email).then(|| profile.email.clone()),
        };
        if !changes.is_empty() {
            self.store
                .update_user(&profile.login, changes)
                .map_err(AuthError::Backend)?;
            info!(login = %profile.login, "local account refreshed");
        }
        info!(login = %profile.login, token = %self.token_hint(), "logged in through SkautIS");
        Ok(AuthenticatedUser {
            login: profile.login,
            display_name: profile.display_name,
            email: profile.email,
            groups: local.groups,
            created: false,
        })
    }

    fn token_hint(&self) -> String {
        self.skautis()
            .user()
            .login_id()
            .map(short_token)
            .unwrap_or_default()
    }
}

fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Password for accounts that only ever log in through SkautIS.
fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
