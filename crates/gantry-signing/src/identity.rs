//! Signing identity types and selection

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::credentials::SigningCredentials;

/// Type of signing identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningIdentityType {
    /// Upload/release key from `key.properties`
    Release,
    /// The local debug keystore every Android SDK install provides
    Development,
}

impl std::fmt::Display for SigningIdentityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Release => write!(f, "Release"),
            Self::Development => write!(f, "Development"),
        }
    }
}

/// The pre-existing development (debug) signing identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevelopmentIdentity {
    store_file: PathBuf,
    key_alias: String,
}

impl DevelopmentIdentity {
    /// Alias the Android SDK generates in the debug keystore
    pub const DEFAULT_ALIAS: &'static str = "androiddebugkey";

    /// Store and key password of the generated debug keystore
    pub const DEFAULT_PASSWORD: &'static str = "android";

    /// Debug identity backed by the keystore at `store_file`
    pub fn at(store_file: impl Into<PathBuf>) -> Self {
        Self {
            store_file: store_file.into(),
            key_alias: Self::DEFAULT_ALIAS.to_string(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.key_alias = alias.into();
        self
    }

    /// `~/.android/debug.keystore`, if a home directory is known
    pub fn default_location() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".android").join("debug.keystore"))
    }

    /// Debug identity at [`DevelopmentIdentity::default_location`], falling
    /// back to a relative `debug.keystore`
    pub fn from_default_location() -> Self {
        Self::at(Self::default_location().unwrap_or_else(|| PathBuf::from("debug.keystore")))
    }

    pub fn store_file(&self) -> &Path {
        &self.store_file
    }

    pub fn key_alias(&self) -> &str {
        &self.key_alias
    }

    pub fn store_password(&self) -> &str {
        Self::DEFAULT_PASSWORD
    }

    pub fn key_password(&self) -> &str {
        Self::DEFAULT_PASSWORD
    }
}

/// The identity the packaging toolchain signs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningIdentity {
    Release(SigningCredentials),
    Development(DevelopmentIdentity),
}

impl SigningIdentity {
    pub fn identity_type(&self) -> SigningIdentityType {
        match self {
            Self::Release(_) => SigningIdentityType::Release,
            Self::Development(_) => SigningIdentityType::Development,
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, Self::Release(_))
    }

    pub fn key_alias(&self) -> &str {
        match self {
            Self::Release(credentials) => credentials.key_alias(),
            Self::Development(identity) => identity.key_alias(),
        }
    }

    pub fn store_file(&self) -> &Path {
        match self {
            Self::Release(credentials) => credentials.store_file(),
            Self::Development(identity) => identity.store_file(),
        }
    }

    /// Release credentials, if this is a release identity
    pub fn credentials(&self) -> Option<&SigningCredentials> {
        match self {
            Self::Release(credentials) => Some(credentials),
            Self::Development(_) => None,
        }
    }

    /// Password-free description suitable for display and JSON output
    pub fn summary(&self) -> IdentitySummary {
        IdentitySummary {
            identity_type: self.identity_type(),
            key_alias: self.key_alias().to_string(),
            store_file: self.store_file().to_path_buf(),
        }
    }
}

impl std::fmt::Display for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) [{}]",
            self.key_alias(),
            self.store_file().display(),
            self.identity_type()
        )
    }
}

/// Serializable view of a [`SigningIdentity`] without secrets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentitySummary {
    #[serde(rename = "type")]
    pub identity_type: SigningIdentityType,
    pub key_alias: String,
    pub store_file: PathBuf,
}

/// Select the signing identity for a release build.
///
/// Depends only on whether `credentials` is present: present credentials
/// always produce a release identity, absent ones always produce `development`.
pub fn select_identity(
    credentials: Option<SigningCredentials>,
    development: &DevelopmentIdentity,
) -> SigningIdentity {
    match credentials {
        Some(credentials) => {
            info!(key_alias = credentials.key_alias(), "using release signing identity");
            SigningIdentity::Release(credentials)
        }
        None => {
            debug!(
                store_file = %development.store_file().display(),
                "no release credentials, using development signing identity"
            );
            SigningIdentity::Development(development.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> SigningCredentials {
        SigningCredentials::new("upload", "key-pass", "/keys/upload.jks", "store-pass")
    }

    #[test]
    fn test_select_release_when_credentials_present() {
        let debug = DevelopmentIdentity::at("/home/dev/.android/debug.keystore");
        let identity = select_identity(Some(credentials()), &debug);

        assert!(identity.is_release());
        assert_eq!(identity.identity_type(), SigningIdentityType::Release);
        assert_eq!(identity.key_alias(), "upload");
        assert_eq!(identity.store_file(), Path::new("/keys/upload.jks"));
        assert_eq!(identity.credentials(), Some(&credentials()));
    }

    #[test]
    fn test_select_development_when_absent() {
        let debug = DevelopmentIdentity::at("/home/dev/.android/debug.keystore");
        let identity = select_identity(None, &debug);

        assert_eq!(identity, SigningIdentity::Development(debug));
        assert_eq!(identity.key_alias(), DevelopmentIdentity::DEFAULT_ALIAS);
        assert!(identity.credentials().is_none());
    }

    #[test]
    fn test_development_defaults() {
        let debug = DevelopmentIdentity::at("debug.keystore");
        assert_eq!(debug.key_alias(), "androiddebugkey");
        assert_eq!(debug.store_password(), "android");
        assert_eq!(debug.key_password(), "android");

        let custom = debug.with_alias("ci-debug");
        assert_eq!(custom.key_alias(), "ci-debug");
    }

    #[test]
    fn test_default_location_under_dot_android() {
        if let Some(path) = DevelopmentIdentity::default_location() {
            assert!(path.ends_with(".android/debug.keystore"));
        }
    }

    #[test]
    fn test_summary_has_no_secrets() {
        let identity = SigningIdentity::Release(credentials());
        let json = serde_json::to_string(&identity.summary()).unwrap();

        assert!(json.contains("\"type\":\"release\""));
        assert!(json.contains("upload"));
        assert!(!json.contains("key-pass"));
        assert!(!json.contains("store-pass"));
    }

    #[test]
    fn test_display() {
        let identity = SigningIdentity::Development(DevelopmentIdentity::at("/tmp/debug.keystore"));
        assert_eq!(
            identity.to_string(),
            "androiddebugkey (/tmp/debug.keystore) [Development]"
        );
    }
}
