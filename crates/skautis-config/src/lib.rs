// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the SkautIS client.
//!
//! The file model ([`SkautisConfig`]) is loaded from TOML and `SKAUTIS_*`
//! variables, validated, and then turned into the immutable runtime
//! [`Config`] consumed by the service manager.
//!
//! ```no_run
//! use skautis_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! let runtime = config.service.to_config().expect("app id");
//! println!("talking to {}", runtime.base_url());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod runtime;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{AuthConfig, LoggingConfig, ServiceConfig, SkautisConfig};
pub use runtime::{Config, URL_PRODUCTION, URL_TEST};

/// Loads the standard hierarchy and validates the result.
pub fn load_and_validate() -> Result<SkautisConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &collect_toml_sources())),
    }
}

/// Loads an explicit file (plus env overrides) and validates the result.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<SkautisConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources: Vec<(String, String)> = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Loads TOML text and validates the result.
pub fn load_and_validate_str(toml_content: &str) -> Result<SkautisConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG_FILE))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.into());
    [
        Some(local),
        loader::user_config_path(),
        Some(loader::SYSTEM_CONFIG_PATH.into()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| {
        std::fs::read_to_string(&path)
            .ok()
            .map(|content| (path.display().to_string(), content))
    })
    .collect()
}
