// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory local account store.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use skautis_core::{IdentityStore, LocalUser, NewUser, SkautisError, UserChanges};

/// Identity store backed by a map; remembers the secrets it was given.
#[derive(Default)]
pub struct MemoryIdentityStore {
    users: Mutex<BTreeMap<String, (LocalUser, String)>>,
    updates: Mutex<Vec<(String, UserChanges)>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an existing account.
    pub fn insert(&self, user: LocalUser) {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user.login.clone(), (user, String::new()));
    }

    pub fn user(&self, login: &str) -> Option<LocalUser> {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(login)
            .map(|(user, _)| user.clone())
    }

    pub fn secret(&self, login: &str) -> Option<String> {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(login)
            .map(|(_, secret)| secret.clone())
    }

    pub fn len(&self) -> usize {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every update request received, oldest first.
    pub fn updates(&self) -> Vec<(String, UserChanges)> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn find_user(&self, login: &str) -> Result<Option<LocalUser>, SkautisError> {
        Ok(self.user(login))
    }

    fn create_user(&self, user: NewUser) -> Result<(), SkautisError> {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        if users.contains_key(&user.login) {
            return Err(SkautisError::Identity(format!(
                "user '{}' already exists",
                user.login
            )));
        }
        let local = LocalUser {
            login: user.login.clone(),
            display_name: user.display_name,
            email: user.email,
            groups: user.groups,
        };
        users.insert(user.login, (local, user.secret));
        Ok(())
    }

    fn update_user(&self, login: &str, changes: UserChanges) -> Result<(), SkautisError> {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        let Some((user, _)) = users.get_mut(login) else {
            return Err(SkautisError::Identity(format!("user '{login}' not found")));
        };
        if let Some(name) = &changes.display_name {
            user.display_name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((login.to_string(), changes));
        Ok(())
    }
}
