//! Error types for Gantry

use std::path::PathBuf;

use gantry_signing::SigningError;
use thiserror::Error;

/// Result type alias using GantryError
pub type Result<T> = std::result::Result<T, GantryError>;

/// Main error type for Gantry operations
#[derive(Debug, Error)]
pub enum GantryError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Signing credential errors
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Toolchain default errors
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GantryError {
    /// Whether the error comes from bad configuration input rather than the
    /// environment
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Config(_) | Self::Toolchain(_) => true,
            Self::Signing(err) => matches!(
                err,
                SigningError::ConfigMalformed { .. } | SigningError::InvalidSyntax { .. }
            ),
            _ => false,
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors reading toolchain-supplied defaults
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// A numeric setting holds something else
    #[error("Invalid value for {key} in {path}: '{value}'")]
    InvalidValue {
        path: PathBuf,
        key: String,
        value: String,
    },

    /// A toolchain file exists but cannot be parsed
    #[error("Failed to read toolchain file {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_signing_is_configuration() {
        let err: GantryError = SigningError::ConfigMalformed {
            path: PathBuf::from("key.properties"),
            reason: "missing keys: storeFile".to_string(),
        }
        .into();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_io_is_not_configuration() {
        let err: GantryError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_invalid_value_message() {
        let err = ConfigError::invalid("release.shrink_resources", "requires minify");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: release.shrink_resources - requires minify"
        );
    }
}
