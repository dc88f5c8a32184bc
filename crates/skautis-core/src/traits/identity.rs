// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local identity store contract owned by the host application.

use serde::{Deserialize, Serialize};

use crate::error::SkautisError;

/// A user record in the host's local database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    pub login: String,
    pub display_name: String,
    pub email: String,
    pub groups: Vec<String>,
}

/// Data for creating a local account after the first remote login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub login: String,
    /// Random local secret; the account is only ever used through remote login.
    pub secret: String,
    pub display_name: String,
    pub email: String,
    pub groups: Vec<String>,
}

/// Fields refreshed on an existing local account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    /// Whether the change set touches nothing.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.email.is_none()
    }
}

/// Local user CRUD used by the external-auth integration.
pub trait IdentityStore: Send + Sync {
    /// Looks up a local account by login name.
    fn find_user(&self, login: &str) -> Result<Option<LocalUser>, SkautisError>;

    /// Creates a local account.
    fn create_user(&self, user: NewUser) -> Result<(), SkautisError>;

    /// Updates fields of an existing local account.
    fn update_user(&self, login: &str, changes: UserChanges) -> Result<(), SkautisError>;
}
