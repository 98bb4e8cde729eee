//! Connection parameters and credentials for directory binds

use dirbind_core::LdapSection;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Connect and read timeout applied to every bind attempt (10000 ms)
pub const BIND_TIMEOUT: Duration = Duration::from_millis(10_000);

// ============================================================================
// Connection Configuration
// ============================================================================

/// Authentication mechanism used for the bind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindMode {
    /// Principal and plaintext secret sent in a simple bind request
    #[default]
    Simple,
}

impl BindMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindMode::Simple => "simple",
        }
    }
}

/// Parameters for one directory connection.
///
/// Only the endpoint comes from configuration. Timeouts and bind mode are
/// fixed, and the value cannot be changed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    url: String,
    connect_timeout: Duration,
    read_timeout: Duration,
    bind_mode: BindMode,
}

impl ConnectionConfig {
    /// Build parameters for the directory at `url`
    /// Example: "ldap://dir.example.com:389"
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: BIND_TIMEOUT,
            read_timeout: BIND_TIMEOUT,
            bind_mode: BindMode::Simple,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn bind_mode(&self) -> BindMode {
        self.bind_mode
    }

    /// Upper bound on how long a single call to the factory can block
    pub fn max_attempt_duration(&self) -> Duration {
        self.connect_timeout + self.read_timeout
    }
}

impl From<&LdapSection> for ConnectionConfig {
    fn from(section: &LdapSection) -> Self {
        Self::new(section.url.clone())
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Principal and secret for a single bind attempt.
///
/// `Debug` output redacts the secret.
#[derive(Debug)]
pub struct Credentials {
    principal: String,
    secret: SecretString,
}

impl Credentials {
    pub fn new(principal: &str, secret: &str) -> Self {
        Self {
            principal: principal.to_string(),
            secret: SecretString::from(secret.to_string()),
        }
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub(crate) fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}
