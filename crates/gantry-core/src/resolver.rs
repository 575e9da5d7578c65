//! The build configuration resolver
//!
//! Single pass, synchronous: load optional release credentials, select the
//! signing identity, assemble the [`BuildProfile`]. The credentials file is
//! read at most once per resolver.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use gantry_signing::{
    select_identity, CredentialsLoader, DevelopmentIdentity, IdentitySummary, SigningCredentials,
    SigningIdentity,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::profile::{assemble_profile, BuildProfile, Overrides, ReleaseOptions};
use crate::toolchain::ToolchainDefaults;

/// Resolves a [`BuildProfile`] and [`SigningIdentity`] from injected inputs
#[derive(Debug)]
pub struct Resolver {
    loader: CredentialsLoader,
    development: DevelopmentIdentity,
    overrides: Overrides,
    toolchain: ToolchainDefaults,
    release: ReleaseOptions,
    credentials: OnceCell<Option<SigningCredentials>>,
}

/// Output of one resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub profile: BuildProfile,
    pub identity: SigningIdentity,
}

/// Secret-free, serializable form of a [`Resolution`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    pub profile: BuildProfile,
    pub signing: IdentitySummary,
}

impl Resolution {
    pub fn report(&self) -> ResolutionReport {
        ResolutionReport {
            profile: self.profile.clone(),
            signing: self.identity.summary(),
        }
    }
}

impl ResolutionReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Resolver {
    /// Resolver reading release credentials from `properties_file`, with the
    /// debug keystore in its default location and no overrides
    pub fn new(properties_file: impl Into<PathBuf>) -> Self {
        Self {
            loader: CredentialsLoader::new(properties_file),
            development: DevelopmentIdentity::from_default_location(),
            overrides: Overrides::default(),
            toolchain: ToolchainDefaults::default(),
            release: ReleaseOptions::default(),
            credentials: OnceCell::new(),
        }
    }

    /// Build a resolver from project configuration, loading toolchain
    /// defaults from the configured sources
    pub fn from_config(config: &Config) -> Result<Self> {
        let toolchain =
            ToolchainDefaults::load(&config.toolchain.local_properties, &config.toolchain.pubspec)?;

        let mut development = match &config.signing.debug_keystore {
            Some(path) => DevelopmentIdentity::at(path),
            None => DevelopmentIdentity::from_default_location(),
        };
        if let Some(alias) = &config.signing.debug_key_alias {
            development = development.with_alias(alias);
        }

        let mut resolver = Self::new(&config.signing.properties_file)
            .with_development_identity(development)
            .with_overrides(config.overrides())
            .with_toolchain(toolchain)
            .with_release_options(config.release_options());
        if let Some(dir) = &config.signing.module_dir {
            resolver = resolver.with_module_dir(dir);
        }
        Ok(resolver)
    }

    /// Resolve relative `storeFile` values against `dir`
    pub fn with_module_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.loader = self.loader.with_base_dir(dir);
        self
    }

    pub fn with_development_identity(mut self, identity: DevelopmentIdentity) -> Self {
        self.development = identity;
        self
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_toolchain(mut self, toolchain: ToolchainDefaults) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn with_release_options(mut self, release: ReleaseOptions) -> Self {
        self.release = release;
        self
    }

    pub fn properties_file(&self) -> &Path {
        self.loader.path()
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// Load release credentials, reading the file on first use only.
    ///
    /// `Ok(None)` when the file is absent; an error when it is malformed.
    pub fn load_credentials(&self) -> Result<Option<&SigningCredentials>> {
        if let Some(cached) = self.credentials.get() {
            return Ok(cached.as_ref());
        }

        let loaded = self.loader.load_optional()?;
        Ok(self.credentials.get_or_init(|| loaded).as_ref())
    }

    /// Select the signing identity
    pub fn select_identity(&self) -> Result<SigningIdentity> {
        let credentials = self.load_credentials()?.cloned();
        Ok(select_identity(credentials, &self.development))
    }

    /// Assemble the build profile
    pub fn assemble_profile(&self) -> Result<BuildProfile> {
        assemble_profile(&self.overrides, &self.toolchain, &self.release)
    }

    /// Run the full resolution
    pub fn resolve(&self) -> Result<Resolution> {
        debug!(properties_file = %self.properties_file().display(), "resolving build configuration");
        let identity = self.select_identity()?;
        let profile = self.assemble_profile()?;

        info!(
            application_id = %profile.application_id,
            version = %profile.version_name,
            signing = %identity.identity_type(),
            "build configuration resolved"
        );
        Ok(Resolution { profile, identity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GantryError;
    use gantry_signing::{SigningError, SigningIdentityType};
    use tempfile::TempDir;

    const KEY_PROPERTIES: &str =
        "storePassword=store-secret\nkeyPassword=key-secret\nkeyAlias=upload\nstoreFile=upload-keystore.jks\n";

    fn resolver(temp: &TempDir) -> Resolver {
        Resolver::new(temp.path().join("key.properties"))
            .with_development_identity(DevelopmentIdentity::at(temp.path().join("debug.keystore")))
            .with_overrides(Overrides {
                application_id: Some("com.beatyourrival.app".to_string()),
                target_sdk_version: Some(35),
                ..Default::default()
            })
            .with_toolchain(ToolchainDefaults {
                version_code: Some(12),
                version_name: Some("1.2.0".to_string()),
                min_sdk_version: Some(21),
                ..Default::default()
            })
    }

    #[test]
    fn test_no_properties_file_falls_back_to_development() {
        let temp = TempDir::new().unwrap();
        let resolution = resolver(&temp).resolve().unwrap();

        assert_eq!(resolution.identity.identity_type(), SigningIdentityType::Development);
        assert_eq!(resolution.identity.store_file(), temp.path().join("debug.keystore"));
        assert_eq!(resolution.profile.version_code, 12);
    }

    #[test]
    fn test_complete_properties_select_release() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("key.properties"), KEY_PROPERTIES).unwrap();

        let resolution = resolver(&temp).resolve().unwrap();
        let credentials = resolution.identity.credentials().unwrap();

        assert_eq!(credentials.key_alias(), "upload");
        assert_eq!(
            credentials.store_file(),
            temp.path().join("app").join("upload-keystore.jks")
        );
        assert_eq!(
            credentials,
            &SigningCredentials::new(
                "upload",
                "key-secret",
                temp.path().join("app").join("upload-keystore.jks"),
                "store-secret"
            )
        );
    }

    #[test]
    fn test_module_dir_changes_store_file_base() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("key.properties"), KEY_PROPERTIES).unwrap();

        let identity = resolver(&temp)
            .with_module_dir(temp.path().join("app"))
            .select_identity()
            .unwrap();
        assert_eq!(identity.store_file(), temp.path().join("app").join("upload-keystore.jks"));
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("key.properties"),
            KEY_PROPERTIES.replace("keyAlias=upload\n", ""),
        )
        .unwrap();

        let err = resolver(&temp).resolve().unwrap_err();
        assert!(matches!(
            err,
            GantryError::Signing(SigningError::ConfigMalformed { .. })
        ));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("key.properties"), KEY_PROPERTIES).unwrap();

        let first = resolver(&temp).resolve().unwrap();
        let second = resolver(&temp).resolve().unwrap();
        assert_eq!(first, second);

        let shared = resolver(&temp);
        assert_eq!(shared.resolve().unwrap(), shared.resolve().unwrap());
    }

    #[test]
    fn test_credentials_read_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("key.properties");
        std::fs::write(&path, KEY_PROPERTIES).unwrap();

        let resolver = resolver(&temp);
        let first = resolver.select_identity().unwrap();

        std::fs::remove_file(&path).unwrap();
        let second = resolver.select_identity().unwrap();

        assert!(second.is_release());
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("local.properties"), "flutter.versionCode=3\nflutter.versionName=0.3.0\n").unwrap();

        let mut config = Config::default();
        config.application.application_id = Some("com.example.app".to_string());
        config.application.version_name = Some("0.4.0".to_string());
        config.signing.debug_keystore = Some(PathBuf::from("debug.keystore"));
        config.signing.debug_key_alias = Some("ci".to_string());
        config.rebase(temp.path());

        let resolution = Resolver::from_config(&config).unwrap().resolve().unwrap();
        assert_eq!(resolution.profile.version_code, 3);
        assert_eq!(resolution.profile.version_name, "0.4.0");
        assert_eq!(resolution.identity.key_alias(), "ci");
        assert_eq!(resolution.identity.store_file(), temp.path().join("debug.keystore"));
    }

    #[test]
    fn test_flutter_layout_store_file_in_app_module() {
        let temp = TempDir::new().unwrap();
        let android = temp.path().join("android");
        std::fs::create_dir_all(android.join("app")).unwrap();
        std::fs::write(android.join("key.properties"), KEY_PROPERTIES).unwrap();
        let keystore = android.join("app").join("upload-keystore.jks");
        std::fs::write(&keystore, [0xFEu8, 0xED, 0xFE, 0xED]).unwrap();

        let (config, _) = crate::config::load_config_or_default(&android).unwrap();
        let identity = Resolver::from_config(&config).unwrap().select_identity().unwrap();

        assert_eq!(identity.store_file(), keystore);
        assert!(gantry_signing::inspect_keystore(identity.store_file()).is_ok());
    }

    #[test]
    fn test_report_json_has_no_secrets() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("key.properties"), KEY_PROPERTIES).unwrap();

        let json = resolver(&temp).resolve().unwrap().report().to_json_pretty().unwrap();
        assert!(json.contains("\"application_id\": \"com.beatyourrival.app\""));
        assert!(json.contains("\"type\": \"release\""));
        assert!(!json.contains("store-secret"));
        assert!(!json.contains("key-secret"));
    }
}
