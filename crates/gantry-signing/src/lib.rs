//! Gantry Signing - Signing credentials and identity selection
//!
//! This crate covers the signing half of build configuration resolution:
//! - Parsing Java-style `.properties` files (`key.properties`)
//! - Loading release [`SigningCredentials`] with a missing-file fallback
//! - Selecting between a release and a development [`SigningIdentity`]
//! - Inspecting keystores and writing `key.properties` files

pub mod credentials;
pub mod error;
pub mod identity;
pub mod keystore;
pub mod properties;

pub use credentials::{CredentialsLoader, SigningCredentials, DEFAULT_MODULE_DIR, REQUIRED_KEYS};
pub use error::{Result, SigningError};
pub use identity::{
    select_identity, DevelopmentIdentity, IdentitySummary, SigningIdentity, SigningIdentityType,
};
pub use keystore::{inspect_keystore, KeystoreFormat, KeystoreInfo, KeyPropertiesWriter};
pub use properties::Properties;
