//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "gantry.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "gantry.yaml";

/// Default release credentials file
pub const DEFAULT_KEY_PROPERTIES: &str = "key.properties";

/// Default SDK tooling properties file
pub const DEFAULT_LOCAL_PROPERTIES: &str = "local.properties";

/// Flutter manifest, one level above the Android root project
pub const DEFAULT_PUBSPEC: &str = "../pubspec.yaml";

/// Target SDK pinned for release builds; Play requires API 35
pub const DEFAULT_TARGET_SDK: u32 = 35;

/// Default Java compatibility level
pub const DEFAULT_JAVA_TARGET: &str = "11";

/// ProGuard files used when minify is enabled and none are configured
pub const DEFAULT_PROGUARD_FILES: [&str; 2] = ["proguard-android-optimize.txt", "proguard-rules.pro"];

/// Version code used when neither overrides nor the toolchain supply one
pub const FALLBACK_VERSION_CODE: u32 = 1;

/// Version name used when neither overrides nor the toolchain supply one
pub const FALLBACK_VERSION_NAME: &str = "1.0";

/// Minimum SDK used when neither overrides nor the toolchain supply one
pub const FALLBACK_MIN_SDK: u32 = 21;

/// Target SDK used when neither overrides nor the toolchain supply one
pub const FALLBACK_TARGET_SDK: u32 = 35;

/// Compile SDK used when neither overrides nor the toolchain supply one
pub const FALLBACK_COMPILE_SDK: u32 = 35;

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".gantry.toml",
        ".gantry.yaml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Gantry configuration
# Paths are relative to this file.

[application]
# application_id = "com.example.app"
# version_name = "1.0.0"
# version_code = 1
target_sdk = 35
multidex = true
java_target = "11"

[signing]
properties_file = "key.properties"
module_dir = "app"
# debug_keystore = "debug.keystore"  # default: ~/.android/debug.keystore

[release]
minify_enabled = false
shrink_resources = false
proguard_files = ["proguard-android-optimize.txt", "proguard-rules.pro"]

[lint]
check_release_builds = false
abort_on_error = false

[toolchain]
local_properties = "local.properties"
pubspec = "../pubspec.yaml"
"#;
