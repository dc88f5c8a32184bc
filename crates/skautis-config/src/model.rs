// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file model.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so that typos in
//! `skautis.toml` are reported instead of silently ignored.

use serde::{Deserialize, Serialize};
use skautis_core::SkautisError;

use crate::runtime::Config;

/// Top-level configuration, loaded from TOML files and `SKAUTIS_*` variables.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SkautisConfig {
    /// Remote service settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Local account provisioning settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote service settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Application id issued by the SkautIS administrators.
    #[serde(default)]
    pub app_id: String,

    /// Talk to the test instance instead of production.
    #[serde(default)]
    pub test_mode: bool,

    /// Cache responses per service handle.
    #[serde(default)]
    pub cache: bool,

    /// Accept gzip-compressed responses.
    #[serde(default)]
    pub compression: bool,

    /// Per-request transport timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            test_mode: false,
            cache: false,
            compression: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    /// Builds the immutable runtime configuration.
    pub fn to_config(&self) -> Result<Config, SkautisError> {
        Ok(Config::new(self.app_id.clone())?
            .with_test_mode(self.test_mode)
            .with_cache(self.cache)
            .with_compression(self.compression)
            .with_timeout(std::time::Duration::from_secs(self.timeout_secs)))
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Local account provisioning settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Groups assigned to accounts created on first remote login.
    #[serde(default = "default_groups")]
    pub default_groups: Vec<String>,

    /// Use the login name when the remote person record has no display name.
    #[serde(default = "default_true")]
    pub display_name_fallback: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_groups: default_groups(),
            display_name_fallback: true,
        }
    }
}

fn default_groups() -> Vec<String> {
    vec!["user".to_string()]
}

fn default_true() -> bool {
    true
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level (trace, debug, info, warn, error); `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
