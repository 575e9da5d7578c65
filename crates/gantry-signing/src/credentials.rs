//! Release signing credentials loaded from `key.properties`

use std::fmt;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::error::{Result, SigningError};
use crate::properties::Properties;

/// Property holding the key alias inside the keystore
pub const KEY_ALIAS: &str = "keyAlias";

/// Property holding the key password
pub const KEY_PASSWORD: &str = "keyPassword";

/// Property holding the keystore path
pub const STORE_FILE: &str = "storeFile";

/// Property holding the keystore password
pub const STORE_PASSWORD: &str = "storePassword";

/// Module directory, next to the properties file, that Gradle resolves
/// `storeFile` from
pub const DEFAULT_MODULE_DIR: &str = "app";

/// Every key a credentials file must define
pub const REQUIRED_KEYS: [&str; 4] = [KEY_ALIAS, KEY_PASSWORD, STORE_FILE, STORE_PASSWORD];

/// Credentials for a release signing identity.
///
/// Immutable once built. Passwords never appear in `Debug` output.
pub struct SigningCredentials {
    key_alias: String,
    key_password: SecretString,
    store_file: PathBuf,
    store_password: SecretString,
}

impl SigningCredentials {
    pub fn new(
        key_alias: impl Into<String>,
        key_password: impl Into<String>,
        store_file: impl Into<PathBuf>,
        store_password: impl Into<String>,
    ) -> Self {
        Self {
            key_alias: key_alias.into(),
            key_password: SecretString::from(key_password.into()),
            store_file: store_file.into(),
            store_password: SecretString::from(store_password.into()),
        }
    }

    /// Build credentials from a parsed properties document.
    ///
    /// Every key in [`REQUIRED_KEYS`] must be present with a non-blank value.
    /// A relative `storeFile` is resolved against `base_dir`. `source` is only
    /// used for error reporting.
    pub fn from_properties(props: &Properties, base_dir: &Path, source: &Path) -> Result<Self> {
        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !props.contains_key(key))
            .collect();
        if !missing.is_empty() {
            return Err(SigningError::ConfigMalformed {
                path: source.to_path_buf(),
                reason: format!("missing keys: {}", missing.join(", ")),
            });
        }

        let blank: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| props.get(key).is_some_and(|v| v.trim().is_empty()))
            .collect();
        if !blank.is_empty() {
            return Err(SigningError::ConfigMalformed {
                path: source.to_path_buf(),
                reason: format!("blank values for: {}", blank.join(", ")),
            });
        }

        let value = |key: &str| props.get(key).unwrap_or_default().to_string();

        let store_file = PathBuf::from(value(STORE_FILE));
        let store_file = if store_file.is_absolute() {
            store_file
        } else {
            base_dir.join(store_file)
        };

        Ok(Self::new(
            value(KEY_ALIAS),
            value(KEY_PASSWORD),
            store_file,
            value(STORE_PASSWORD),
        ))
    }

    pub fn key_alias(&self) -> &str {
        &self.key_alias
    }

    pub fn key_password(&self) -> &SecretString {
        &self.key_password
    }

    pub fn store_file(&self) -> &Path {
        &self.store_file
    }

    pub fn store_password(&self) -> &SecretString {
        &self.store_password
    }
}

impl Clone for SigningCredentials {
    fn clone(&self) -> Self {
        Self::new(
            self.key_alias.clone(),
            self.key_password.expose_secret(),
            self.store_file.clone(),
            self.store_password.expose_secret(),
        )
    }
}

impl PartialEq for SigningCredentials {
    fn eq(&self, other: &Self) -> bool {
        self.key_alias == other.key_alias
            && self.store_file == other.store_file
            && self.key_password.expose_secret() == other.key_password.expose_secret()
            && self.store_password.expose_secret() == other.store_password.expose_secret()
    }
}

impl Eq for SigningCredentials {}

impl fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"[REDACTED]")
            .field("store_file", &self.store_file)
            .field("store_password", &"[REDACTED]")
            .finish()
    }
}

/// Loads [`SigningCredentials`] from an explicitly injected path
#[derive(Debug, Clone)]
pub struct CredentialsLoader {
    path: PathBuf,
    base_dir: Option<PathBuf>,
}

impl CredentialsLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            base_dir: None,
        }
    }

    /// Resolve relative `storeFile` values against `dir` instead of the
    /// `app` module next to the properties file
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `key.properties` lives in the Gradle root project but `storeFile` is
    /// read by the app module, so relative paths start there.
    fn base_dir(&self) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(|| {
            self.path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
                .join(DEFAULT_MODULE_DIR)
        })
    }

    /// Load credentials.
    ///
    /// Fails with [`SigningError::ConfigMissing`] when the file is absent or
    /// unreadable and with [`SigningError::ConfigMalformed`] when it cannot
    /// be used.
    pub fn load(&self) -> Result<SigningCredentials> {
        if !self.path.is_file() {
            debug!(path = %self.path.display(), "no signing properties file");
            return Err(SigningError::ConfigMissing {
                path: self.path.clone(),
            });
        }

        let props = match Properties::load(&self.path) {
            Ok(props) => props,
            Err(SigningError::Io(err)) => {
                warn!(path = %self.path.display(), error = %err, "signing properties unreadable");
                return Err(SigningError::ConfigMissing {
                    path: self.path.clone(),
                });
            }
            Err(err) => {
                return Err(SigningError::ConfigMalformed {
                    path: self.path.clone(),
                    reason: err.to_string(),
                })
            }
        };

        let credentials = SigningCredentials::from_properties(&props, &self.base_dir(), &self.path)?;
        info!(
            path = %self.path.display(),
            key_alias = credentials.key_alias(),
            "loaded release signing credentials"
        );
        Ok(credentials)
    }

    /// Load credentials, mapping a missing file to `None`
    pub fn load_optional(&self) -> Result<Option<SigningCredentials>> {
        match self.load() {
            Ok(credentials) => Ok(Some(credentials)),
            Err(err) if err.is_missing() => Ok(None),
            Err(err) => Err(err),
        }
    }
}
