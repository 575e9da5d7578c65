//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::profile::{LintOptions, Overrides, ReleaseOptions};

use super::defaults::{
    DEFAULT_JAVA_TARGET, DEFAULT_KEY_PROPERTIES, DEFAULT_LOCAL_PROPERTIES, DEFAULT_PROGUARD_FILES,
    DEFAULT_PUBSPEC, DEFAULT_TARGET_SDK,
};

/// Main configuration for Gantry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application identity and SDK overrides
    pub application: ApplicationConfig,

    /// Signing credential sources
    pub signing: SigningConfig,

    /// Release build type settings
    pub release: ReleaseConfig,

    /// Lint settings for release builds
    pub lint: LintConfig,

    /// Where toolchain defaults come from
    pub toolchain: ToolchainConfig,
}

impl Config {
    /// Make every relative path in the configuration relative to `base`
    pub fn rebase(&mut self, base: &Path) {
        let join = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        join(&mut self.signing.properties_file);
        if let Some(dir) = self.signing.module_dir.as_mut() {
            join(dir);
        }
        if let Some(keystore) = self.signing.debug_keystore.as_mut() {
            join(keystore);
        }
        join(&mut self.toolchain.local_properties);
        join(&mut self.toolchain.pubspec);
    }

    /// Explicit overrides declared in the `application` section
    pub fn overrides(&self) -> Overrides {
        let app = &self.application;
        Overrides {
            application_id: app.application_id.clone(),
            namespace: app.namespace.clone(),
            version_code: app.version_code,
            version_name: app.version_name.clone(),
            min_sdk_version: app.min_sdk,
            target_sdk_version: app.target_sdk,
            compile_sdk_version: app.compile_sdk,
            ndk_version: app.ndk_version.clone(),
        }
    }

    /// Literal release settings
    pub fn release_options(&self) -> ReleaseOptions {
        ReleaseOptions {
            minify_enabled: self.release.minify_enabled,
            shrink_resources_enabled: self.release.shrink_resources,
            proguard_files: self.release.proguard_files.clone(),
            multidex_enabled: self.application.multidex,
            java_target: self.application.java_target.clone(),
            lint: LintOptions {
                check_release_builds: self.lint.check_release_builds,
                abort_on_error: self.lint.abort_on_error,
            },
        }
    }
}

/// Application identity configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Package name, e.g. `com.example.app`
    pub application_id: Option<String>,

    /// Code namespace (defaults to the application id)
    pub namespace: Option<String>,

    /// Explicit version code
    pub version_code: Option<u32>,

    /// Explicit version name
    pub version_name: Option<String>,

    /// Minimum platform (SDK) version
    pub min_sdk: Option<u32>,

    /// Target platform (SDK) version, pinned rather than taken from the
    /// toolchain
    pub target_sdk: Option<u32>,

    /// Compile platform (SDK) version
    pub compile_sdk: Option<u32>,

    /// NDK version
    pub ndk_version: Option<String>,

    /// Whether multidex is enabled
    pub multidex: bool,

    /// Java source/target compatibility level
    pub java_target: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            application_id: None,
            namespace: None,
            version_code: None,
            version_name: None,
            min_sdk: None,
            target_sdk: Some(DEFAULT_TARGET_SDK),
            compile_sdk: None,
            ndk_version: None,
            multidex: true,
            java_target: DEFAULT_JAVA_TARGET.to_string(),
        }
    }
}

/// Signing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Release credentials properties file
    pub properties_file: PathBuf,

    /// Directory relative `storeFile` values resolve against
    /// (defaults to `app` next to `properties_file`)
    pub module_dir: Option<PathBuf>,

    /// Debug keystore (defaults to `~/.android/debug.keystore`)
    pub debug_keystore: Option<PathBuf>,

    /// Alias inside the debug keystore
    pub debug_key_alias: Option<String>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            properties_file: PathBuf::from(DEFAULT_KEY_PROPERTIES),
            module_dir: None,
            debug_keystore: None,
            debug_key_alias: None,
        }
    }
}

/// Release build type configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Enable code shrinking/obfuscation
    pub minify_enabled: bool,

    /// Enable resource shrinking (requires `minify_enabled`)
    pub shrink_resources: bool,

    /// ProGuard rule files applied when minify is enabled
    pub proguard_files: Vec<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            minify_enabled: false,
            shrink_resources: false,
            proguard_files: DEFAULT_PROGUARD_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Lint configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Run lint as part of release builds
    pub check_release_builds: bool,

    /// Fail the build on lint errors
    pub abort_on_error: bool,
}

/// Toolchain default sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// `local.properties` written by the SDK tooling
    pub local_properties: PathBuf,

    /// `pubspec.yaml` carrying `version: <name>+<code>`
    pub pubspec: PathBuf,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            local_properties: PathBuf::from(DEFAULT_LOCAL_PROPERTIES),
            pubspec: PathBuf::from(DEFAULT_PUBSPEC),
        }
    }
}
