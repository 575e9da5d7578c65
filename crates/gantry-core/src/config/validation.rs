//! Configuration validation

use regex::Regex;
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Dotted Java identifiers, at least two segments (`com.example`)
const APPLICATION_ID_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$";

/// Check that `id` is usable as an application id or namespace
pub fn is_valid_application_id(id: &str) -> bool {
    Regex::new(APPLICATION_ID_PATTERN)
        .map(|re| re.is_match(id))
        .unwrap_or(false)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_application(config)?;
    validate_release(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_application(config: &Config) -> Result<()> {
    let app = &config.application;

    for (field, value) in [
        ("application.application_id", &app.application_id),
        ("application.namespace", &app.namespace),
    ] {
        if let Some(id) = value {
            if !is_valid_application_id(id) {
                return Err(ConfigError::invalid(
                    field,
                    format!("'{}' is not a dotted identifier like com.example.app", id),
                )
                .into());
            }
        }
    }

    if app.version_code == Some(0) {
        return Err(ConfigError::invalid("application.version_code", "must be greater than 0").into());
    }

    if app.version_name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(ConfigError::invalid("application.version_name", "cannot be empty").into());
    }

    if let (Some(min), Some(target)) = (app.min_sdk, app.target_sdk) {
        if min > target {
            return Err(ConfigError::invalid(
                "application.min_sdk",
                format!("min_sdk ({}) is greater than target_sdk ({})", min, target),
            )
            .into());
        }
    }

    if app.java_target.trim().is_empty() {
        return Err(ConfigError::invalid("application.java_target", "cannot be empty").into());
    }

    Ok(())
}

fn validate_release(config: &Config) -> Result<()> {
    if config.release.shrink_resources && !config.release.minify_enabled {
        return Err(ConfigError::invalid(
            "release.shrink_resources",
            "resource shrinking requires minify_enabled = true",
        )
        .into());
    }

    if config.signing.properties_file.as_os_str().is_empty() {
        return Err(ConfigError::invalid("signing.properties_file", "cannot be empty").into());
    }

    Ok(())
}
