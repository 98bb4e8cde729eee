//! Dirbind Core Library
//!
//! Configuration and shared error types for the Dirbind directory
//! authentication workspace.

pub mod config;
pub mod error;

pub use config::{DirbindConfig, LdapSection, LoggingConfig};
pub use error::{Error, Result};

/// Dirbind version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// URL schemes accepted for the directory endpoint
pub const LDAP_SCHEMES: &[&str] = &["ldap", "ldaps", "ldapi"];
