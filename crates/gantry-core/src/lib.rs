//! Gantry Core - Build configuration resolution
//!
//! This crate provides the error types, project configuration, toolchain
//! defaults and the [`Resolver`] that turns them into a [`BuildProfile`] plus
//! a selected signing identity.

pub mod config;
pub mod error;
pub mod profile;
pub mod resolver;
pub mod toolchain;

pub use error::{ConfigError, GantryError, Result, ToolchainError};
pub use profile::{assemble_profile, BuildProfile, LintOptions, Overrides, ReleaseOptions};
pub use resolver::{Resolution, ResolutionReport, Resolver};
pub use toolchain::ToolchainDefaults;
