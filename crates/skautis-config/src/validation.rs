// SPDX-FileCopyrightText: 2026 SkautIS Client Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checks that serde cannot express.

use crate::diagnostic::ConfigError;
use crate::model::SkautisConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Longest accepted transport timeout, in seconds.
const MAX_TIMEOUT_SECS: u64 = 600;

/// Collects every validation problem instead of stopping at the first.
pub fn validate_config(config: &SkautisConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.service.app_id.trim().is_empty() {
        errors.push(ConfigError::MissingKey {
            key: "service.app_id".to_string(),
        });
    }

    if config.service.timeout_secs == 0 || config.service.timeout_secs > MAX_TIMEOUT_SECS {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}, got {}",
                config.service.timeout_secs
            ),
        });
    }

    if config
        .auth
        .default_groups
        .iter()
        .any(|group| group.trim().is_empty())
    {
        errors.push(ConfigError::Validation {
            message: "auth.default_groups must not contain empty names".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.logging.level
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
