// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable runtime settings shared by the manager and the facade.

use std::time::Duration;

use skautis_core::{CallOptions, SkautisError};

/// Base URL of the SkautIS test instance.
pub const URL_TEST: &str = "https://test-is.skaut.cz/";

/// Base URL of the SkautIS production instance.
pub const URL_PRODUCTION: &str = "https://is.skaut.cz/";

/// Runtime settings. The application id is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    app_id: String,
    test_mode: bool,
    cache: bool,
    compression: bool,
    timeout: Duration,
}

impl Config {
    /// Creates a production configuration with caching and compression off.
    ///
    /// Fails fast when the application id is empty.
    pub fn new(app_id: impl Into<String>) -> Result<Self, SkautisError> {
        let app_id = app_id.into();
        if app_id.trim().is_empty() {
            return Err(SkautisError::Config("app id cannot be empty".to_string()));
        }
        Ok(Self {
            app_id,
            test_mode: false,
            cache: false,
            compression: false,
            timeout: Duration::from_secs(30),
        })
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn cache(&self) -> bool {
        self.cache
    }

    pub fn compression(&self) -> bool {
        self.compression
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start of every SkautIS URL; depends only on the mode.
    pub fn base_url(&self) -> &'static str {
        if self.test_mode {
            URL_TEST
        } else {
            URL_PRODUCTION
        }
    }

    /// Prefix of the login, logout and registration pages.
    pub fn login_url_base(&self) -> String {
        format!("{}Login/", self.base_url())
    }

    /// Per-service options for a service bound to `login_id`.
    pub fn call_options(&self, login_id: Option<&str>) -> CallOptions {
        CallOptions {
            app_id: self.app_id.clone(),
            login_id: login_id.map(str::to_string),
            compression: self.compression,
            cache: self.cache,
            timeout: self.timeout,
        }
    }
}
