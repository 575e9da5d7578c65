//! Defaults supplied by the surrounding SDK toolchain
//!
//! The Flutter tool writes `flutter.*` entries into `local.properties` and
//! keeps the app version in `pubspec.yaml`. Both are optional; whatever they
//! provide is used only where no explicit override exists.

use std::path::Path;
use std::str::FromStr;

use gantry_signing::Properties;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, ToolchainError};

const MIN_SDK_KEY: &str = "flutter.minSdkVersion";
const TARGET_SDK_KEY: &str = "flutter.targetSdkVersion";
const COMPILE_SDK_KEY: &str = "flutter.compileSdkVersion";
const NDK_VERSION_KEY: &str = "flutter.ndkVersion";
const VERSION_CODE_KEY: &str = "flutter.versionCode";
const VERSION_NAME_KEY: &str = "flutter.versionName";

/// Toolchain-supplied build values. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainDefaults {
    pub min_sdk_version: Option<u32>,
    pub target_sdk_version: Option<u32>,
    pub compile_sdk_version: Option<u32>,
    pub ndk_version: Option<String>,
    pub version_code: Option<u32>,
    pub version_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Pubspec {
    version: Option<serde_yaml::Value>,
}

impl ToolchainDefaults {
    /// Read `flutter.*` entries from a parsed `local.properties`
    pub fn from_local_properties(props: &Properties, path: &Path) -> Result<Self> {
        let text = |key: &str| {
            props
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            min_sdk_version: parse_number(props, MIN_SDK_KEY, path)?,
            target_sdk_version: parse_number(props, TARGET_SDK_KEY, path)?,
            compile_sdk_version: parse_number(props, COMPILE_SDK_KEY, path)?,
            ndk_version: text(NDK_VERSION_KEY),
            version_code: parse_number(props, VERSION_CODE_KEY, path)?,
            version_name: text(VERSION_NAME_KEY),
        })
    }

    /// Read `version: <name>+<code>` from pubspec content
    pub fn from_pubspec(content: &str, path: &Path) -> Result<Self> {
        let pubspec: Pubspec =
            serde_yaml::from_str(content).map_err(|e| ToolchainError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let version = match pubspec.version {
            Some(serde_yaml::Value::String(s)) => s,
            Some(serde_yaml::Value::Number(n)) => n.to_string(),
            Some(serde_yaml::Value::Null) | None => return Ok(Self::default()),
            Some(other) => {
                return Err(ToolchainError::InvalidValue {
                    path: path.to_path_buf(),
                    key: "version".to_string(),
                    value: format!("{:?}", other),
                }
                .into())
            }
        };

        let (name, code) = match version.trim().split_once('+') {
            Some((name, code)) => (name.trim(), Some(code.trim())),
            None => (version.trim(), None),
        };

        let version_code = code
            .map(|code| {
                code.parse::<u32>().map_err(|_| ToolchainError::InvalidValue {
                    path: path.to_path_buf(),
                    key: "version".to_string(),
                    value: version.clone(),
                })
            })
            .transpose()?;

        Ok(Self {
            version_name: Some(name.to_string()).filter(|n| !n.is_empty()),
            version_code,
            ..Self::default()
        })
    }

    /// Load from both sources; `local.properties` wins where both are set.
    /// Missing files contribute nothing.
    pub fn load(local_properties: &Path, pubspec: &Path) -> Result<Self> {
        let from_local = if local_properties.is_file() {
            let props = Properties::load(local_properties).map_err(|e| ToolchainError::Unreadable {
                path: local_properties.to_path_buf(),
                reason: e.to_string(),
            })?;
            Self::from_local_properties(&props, local_properties)?
        } else {
            debug!(path = %local_properties.display(), "no local.properties");
            Self::default()
        };

        let from_pubspec = if pubspec.is_file() {
            let content = std::fs::read_to_string(pubspec)?;
            Self::from_pubspec(&content, pubspec)?
        } else {
            debug!(path = %pubspec.display(), "no pubspec.yaml");
            Self::default()
        };

        let defaults = from_local.or(from_pubspec);
        debug!(?defaults, "toolchain defaults loaded");
        Ok(defaults)
    }

    /// Fill every unset field from `fallback`
    pub fn or(self, fallback: Self) -> Self {
        Self {
            min_sdk_version: self.min_sdk_version.or(fallback.min_sdk_version),
            target_sdk_version: self.target_sdk_version.or(fallback.target_sdk_version),
            compile_sdk_version: self.compile_sdk_version.or(fallback.compile_sdk_version),
            ndk_version: self.ndk_version.or(fallback.ndk_version),
            version_code: self.version_code.or(fallback.version_code),
            version_name: self.version_name.or(fallback.version_name),
        }
    }
}

fn parse_number<T: FromStr>(props: &Properties, key: &str, path: &Path) -> Result<Option<T>> {
    match props.get(key).map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            ToolchainError::InvalidValue {
                path: path.to_path_buf(),
                key: key.to_string(),
                value: value.to_string(),
            }
            .into()
        }),
    }
}
