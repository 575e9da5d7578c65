//! Build profile assembly

use serde::Serialize;
use tracing::debug;

use crate::config::defaults::{
    DEFAULT_JAVA_TARGET, DEFAULT_PROGUARD_FILES, FALLBACK_COMPILE_SDK, FALLBACK_MIN_SDK,
    FALLBACK_TARGET_SDK, FALLBACK_VERSION_CODE, FALLBACK_VERSION_NAME,
};
use crate::config::validation::is_valid_application_id;
use crate::error::{ConfigError, Result};
use crate::toolchain::ToolchainDefaults;

/// Explicitly supplied values. Anything set here beats toolchain defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub application_id: Option<String>,
    pub namespace: Option<String>,
    pub version_code: Option<u32>,
    pub version_name: Option<String>,
    pub min_sdk_version: Option<u32>,
    pub target_sdk_version: Option<u32>,
    pub compile_sdk_version: Option<u32>,
    pub ndk_version: Option<String>,
}

impl Overrides {
    /// Layer `higher` on top of `self`; set fields in `higher` win
    pub fn merge(self, higher: Overrides) -> Overrides {
        Overrides {
            application_id: higher.application_id.or(self.application_id),
            namespace: higher.namespace.or(self.namespace),
            version_code: higher.version_code.or(self.version_code),
            version_name: higher.version_name.or(self.version_name),
            min_sdk_version: higher.min_sdk_version.or(self.min_sdk_version),
            target_sdk_version: higher.target_sdk_version.or(self.target_sdk_version),
            compile_sdk_version: higher.compile_sdk_version.or(self.compile_sdk_version),
            ndk_version: higher.ndk_version.or(self.ndk_version),
        }
    }
}

/// Lint behaviour for release builds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LintOptions {
    pub check_release_builds: bool,
    pub abort_on_error: bool,
}

/// Literal release build settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOptions {
    pub minify_enabled: bool,
    pub shrink_resources_enabled: bool,
    pub proguard_files: Vec<String>,
    pub multidex_enabled: bool,
    pub java_target: String,
    pub lint: LintOptions,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            minify_enabled: false,
            shrink_resources_enabled: false,
            proguard_files: DEFAULT_PROGUARD_FILES.iter().map(|s| s.to_string()).collect(),
            multidex_enabled: true,
            java_target: DEFAULT_JAVA_TARGET.to_string(),
            lint: LintOptions::default(),
        }
    }
}

/// Resolved build-time metadata for one packaging run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildProfile {
    pub application_id: String,
    pub namespace: String,
    pub min_sdk_version: u32,
    pub target_sdk_version: u32,
    pub compile_sdk_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,
    pub version_code: u32,
    pub version_name: String,
    pub multidex_enabled: bool,
    pub java_target: String,
    pub minify_enabled: bool,
    pub shrink_resources_enabled: bool,
    /// Only populated when minify is enabled
    pub proguard_files: Vec<String>,
    pub lint: LintOptions,
}

/// Merge overrides, toolchain defaults and built-in fallbacks, in that order
/// of precedence.
pub fn assemble_profile(
    overrides: &Overrides,
    toolchain: &ToolchainDefaults,
    release: &ReleaseOptions,
) -> Result<BuildProfile> {
    let application_id = overrides
        .application_id
        .clone()
        .ok_or_else(|| ConfigError::MissingField("application.application_id".to_string()))?;
    let namespace = overrides
        .namespace
        .clone()
        .unwrap_or_else(|| application_id.clone());

    for (field, id) in [
        ("application.application_id", &application_id),
        ("application.namespace", &namespace),
    ] {
        if !is_valid_application_id(id) {
            return Err(ConfigError::invalid(field, format!("'{}' is not a valid identifier", id)).into());
        }
    }

    let min_sdk_version = overrides
        .min_sdk_version
        .or(toolchain.min_sdk_version)
        .unwrap_or(FALLBACK_MIN_SDK);
    let target_sdk_version = overrides
        .target_sdk_version
        .or(toolchain.target_sdk_version)
        .unwrap_or(FALLBACK_TARGET_SDK);
    let compile_sdk_version = overrides
        .compile_sdk_version
        .or(toolchain.compile_sdk_version)
        .unwrap_or(FALLBACK_COMPILE_SDK);

    if min_sdk_version > target_sdk_version {
        return Err(ConfigError::invalid(
            "min_sdk_version",
            format!(
                "resolved min SDK {} is above target SDK {}",
                min_sdk_version, target_sdk_version
            ),
        )
        .into());
    }

    let version_code = overrides
        .version_code
        .or(toolchain.version_code)
        .unwrap_or(FALLBACK_VERSION_CODE);
    if version_code == 0 {
        return Err(ConfigError::invalid("version_code", "must be greater than 0").into());
    }

    let version_name = overrides
        .version_name
        .clone()
        .or_else(|| toolchain.version_name.clone())
        .unwrap_or_else(|| FALLBACK_VERSION_NAME.to_string());

    if release.shrink_resources_enabled && !release.minify_enabled {
        return Err(ConfigError::invalid(
            "release.shrink_resources",
            "resource shrinking requires minify to be enabled",
        )
        .into());
    }

    let proguard_files = if release.minify_enabled {
        release.proguard_files.clone()
    } else {
        Vec::new()
    };

    let profile = BuildProfile {
        application_id,
        namespace,
        min_sdk_version,
        target_sdk_version,
        compile_sdk_version,
        ndk_version: overrides.ndk_version.clone().or_else(|| toolchain.ndk_version.clone()),
        version_code,
        version_name,
        multidex_enabled: release.multidex_enabled,
        java_target: release.java_target.clone(),
        minify_enabled: release.minify_enabled,
        shrink_resources_enabled: release.shrink_resources_enabled,
        proguard_files,
        lint: release.lint,
    };
    debug!(
        application_id = %profile.application_id,
        version_name = %profile.version_name,
        version_code = profile.version_code,
        "assembled build profile"
    );
    Ok(profile)
}
