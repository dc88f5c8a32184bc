// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order (later overrides earlier): compiled defaults,
//! `/etc/skautis/skautis.toml`, `~/.config/skautis/skautis.toml`,
//! `./skautis.toml`, then `SKAUTIS_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SkautisConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/skautis/skautis.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "skautis.toml";

/// Per-user configuration file under the XDG config directory, if any.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("skautis").join(LOCAL_CONFIG_FILE))
}

/// Figment with every layer merged, before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(SkautisConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(path) = user_config_path() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(Toml::file(LOCAL_CONFIG_FILE)).merge(env_provider())
}

/// Loads configuration from the standard hierarchy.
pub fn load_config() -> Result<SkautisConfig, figment::Error> {
    build_figment().extract()
}

/// Loads configuration from an explicit file, still honoring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<SkautisConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SkautisConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Loads configuration from TOML text only.
pub fn load_config_from_str(toml_content: &str) -> Result<SkautisConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SkautisConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Maps `SKAUTIS_SERVICE_APP_ID` to `service.app_id`.
///
/// Only the section prefix is rewritten so key names keep their underscores.
fn env_provider() -> Env {
    Env::prefixed("SKAUTIS_").map(|key| {
        key.as_str()
            .to_ascii_lowercase()
            .replacen("service_", "service.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("logging_", "logging.", 1)
            .into()
    })
}
