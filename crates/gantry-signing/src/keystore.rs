//! Keystore inspection and `key.properties` generation

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::credentials::{KEY_ALIAS, KEY_PASSWORD, STORE_FILE, STORE_PASSWORD};
use crate::error::{Result, SigningError};
use crate::properties::Properties;

/// On-disk keystore container format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeystoreFormat {
    Jks,
    Pkcs12,
}

impl KeystoreFormat {
    /// Detect the format from the leading bytes.
    ///
    /// JKS files start with `FE ED FE ED`; everything else is treated as
    /// PKCS#12, the default `keytool` format since JDK 9.
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(&[0xFE, 0xED, 0xFE, 0xED]) {
            Self::Jks
        } else {
            Self::Pkcs12
        }
    }
}

impl std::fmt::Display for KeystoreFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jks => write!(f, "JKS"),
            Self::Pkcs12 => write!(f, "PKCS12"),
        }
    }
}

/// Facts about a keystore file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeystoreInfo {
    pub path: PathBuf,
    pub format: KeystoreFormat,
    /// SHA-256 of the file contents, colon-separated hex
    pub fingerprint: String,
    pub size: u64,
}

/// Read a keystore file and describe it
pub fn inspect_keystore(path: &Path) -> Result<KeystoreInfo> {
    if !path.is_file() {
        return Err(SigningError::KeystoreNotFound(path.to_path_buf()));
    }

    let data = std::fs::read(path)?;
    let info = KeystoreInfo {
        path: path.to_path_buf(),
        format: KeystoreFormat::detect(&data),
        fingerprint: fingerprint(&data),
        size: data.len() as u64,
    };
    debug!(path = %path.display(), format = %info.format, "inspected keystore");
    Ok(info)
}

fn fingerprint(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Writes `key.properties` files in the layout Gradle scripts expect
pub struct KeyPropertiesWriter {
    store_file: PathBuf,
    key_alias: String,
    store_password: SecretString,
    key_password: SecretString,
    overwrite: bool,
}

impl KeyPropertiesWriter {
    pub fn new(
        store_file: impl Into<PathBuf>,
        key_alias: impl Into<String>,
        store_password: SecretString,
        key_password: SecretString,
    ) -> Self {
        Self {
            store_file: store_file.into(),
            key_alias: key_alias.into(),
            store_password,
            key_password,
            overwrite: false,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// File contents, passwords included
    pub fn render(&self) -> String {
        let mut props = Properties::new();
        props.insert(STORE_PASSWORD, self.store_password.expose_secret());
        props.insert(KEY_PASSWORD, self.key_password.expose_secret());
        props.insert(KEY_ALIAS, self.key_alias.as_str());
        props.insert(STORE_FILE, self.store_file.to_string_lossy());
        props.render()
    }

    /// Write to `path`, readable only by the owner on Unix
    pub fn write(&self, path: &Path) -> Result<()> {
        if path.exists() && !self.overwrite {
            return Err(SigningError::AlreadyExists(path.to_path_buf()));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.render())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        info!(path = %path.display(), key_alias = %self.key_alias, "wrote key.properties");
        Ok(())
    }
}
