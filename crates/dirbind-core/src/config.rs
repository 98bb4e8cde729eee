//! Configuration for Dirbind
//!
//! Example config:
//! ```toml
//! [ldap]
//! url = "ldap://dir.example.com:389"
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirbindConfig {
    #[serde(default)]
    pub ldap: LdapSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DirbindConfig {
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::ConfigRead(format!("{}: {}", path, e)))?;

        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse(e.to_string()))?;

        debug!("Loaded config from {}", path);
        Ok(config)
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from the `DIRBIND_*` variables returned by `lookup`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DIRBIND_LDAP_URL") {
            config.ldap.url = url;
        }
        if let Some(level) = lookup("DIRBIND_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = lookup("DIRBIND_LOG_FORMAT") {
            config.logging.format = format;
        }

        config
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.ldap.validate()
    }
}

/// Directory service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdapSection {
    /// Directory server URL (ldap://, ldaps:// or ldapi://)
    /// Example: "ldap://dir.example.com:389"
    #[serde(default = "default_ldap_url")]
    pub url: String,
}

fn default_ldap_url() -> String {
    "ldap://localhost:389".to_string()
}

impl Default for LdapSection {
    fn default() -> Self {
        Self {
            url: default_ldap_url(),
        }
    }
}

impl LdapSection {
    pub fn validate(&self) -> crate::Result<()> {
        if self.url.trim().is_empty() {
            return Err(crate::Error::InvalidUrl("url is required".into()));
        }

        let parsed = url::Url::parse(&self.url)
            .map_err(|e| crate::Error::InvalidUrl(format!("{}: {}", self.url, e)))?;

        if !crate::LDAP_SCHEMES.contains(&parsed.scheme()) {
            return Err(crate::Error::InvalidUrl(format!(
                "unsupported scheme '{}', expected one of {:?}",
                parsed.scheme(),
                crate::LDAP_SCHEMES
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
