//! Exit codes for the CLI

use gantry_core::GantryError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error (malformed key.properties, invalid gantry.toml)
pub const CONFIG_ERROR: i32 = 2;

/// Validation error
pub const VALIDATION_ERROR: i32 = 5;

/// `gantry validate` found at least one error
#[derive(Debug, thiserror::Error)]
#[error("Validation failed with {errors} error(s)")]
pub struct ValidationFailed {
    pub errors: usize,
}

/// Map a command failure to a process exit code
pub fn for_error(err: &anyhow::Error) -> i32 {
    if err.is::<ValidationFailed>() {
        return VALIDATION_ERROR;
    }
    match err.downcast_ref::<GantryError>() {
        Some(gantry) if gantry.is_configuration() => CONFIG_ERROR,
        _ => ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::ConfigError;
    use gantry_signing::SigningError;
    use std::path::PathBuf;

    #[test]
    fn test_malformed_properties_is_config_error() {
        let err = anyhow::Error::new(GantryError::from(SigningError::ConfigMalformed {
            path: PathBuf::from("key.properties"),
            reason: "missing keys: storeFile".to_string(),
        }));
        assert_eq!(for_error(&err), CONFIG_ERROR);
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let err = anyhow::Error::new(GantryError::from(ConfigError::MissingField(
            "application.application_id".to_string(),
        )));
        assert_eq!(for_error(&err), CONFIG_ERROR);
    }

    #[test]
    fn test_validation_failure() {
        let err = anyhow::Error::new(ValidationFailed { errors: 2 });
        assert_eq!(for_error(&err), VALIDATION_ERROR);
        assert_eq!(err.to_string(), "Validation failed with 2 error(s)");
    }

    #[test]
    fn test_other_errors() {
        assert_eq!(for_error(&anyhow::anyhow!("boom")), ERROR);
    }
}
