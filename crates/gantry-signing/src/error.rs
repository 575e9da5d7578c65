//! Error types for signing configuration

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for signing operations
pub type Result<T> = std::result::Result<T, SigningError>;

/// Signing-related errors
#[derive(Debug, Error)]
pub enum SigningError {
    /// The credentials property file does not exist or could not be read.
    ///
    /// Not fatal: callers fall back to the development identity.
    #[error("Signing properties not found at {path}")]
    ConfigMissing { path: PathBuf },

    /// The credentials property file exists but cannot be used
    #[error("Malformed signing properties in {path}: {reason}")]
    ConfigMalformed { path: PathBuf, reason: String },

    /// Syntax error in a `.properties` document
    #[error("Invalid properties syntax on line {line}: {reason}")]
    InvalidSyntax { line: usize, reason: String },

    /// Keystore file referenced by the credentials does not exist
    #[error("Keystore not found: {0}")]
    KeystoreNotFound(PathBuf),

    /// Refusing to overwrite an existing file
    #[error("File already exists: {0}")]
    AlreadyExists(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SigningError {
    /// Whether this error only means "no release credentials available"
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::ConfigMissing { .. })
    }

    /// Whether this error must abort the build before packaging
    pub fn is_fatal(&self) -> bool {
        !self.is_missing()
    }
}
