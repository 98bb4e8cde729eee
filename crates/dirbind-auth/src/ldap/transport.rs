//! Wire-level access to the directory server
//!
//! The factory talks to the directory through [`DirectoryTransport`] and
//! [`DirectoryConnection`]. [`Ldap3Transport`] is the production
//! implementation on top of `ldap3`.

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Low-level failure while connecting to or binding against the directory.
///
/// Never shown to callers of the factory; it travels as the source of an
/// [`AuthenticationFailure`](crate::AuthenticationFailure) for server-side logs.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Failed to connect to LDAP server: {0}")]
    Connect(String),

    /// RC 49 = invalid credentials, RC 53 = unwilling to perform
    #[error("Bind rejected with code {rc}: {text}")]
    BindRejected { rc: u32, text: String },

    #[error("LDAP {phase} timed out after {after_ms} ms")]
    Timeout { phase: &'static str, after_ms: u64 },

    #[error(transparent)]
    Ldap3(#[from] ldap3::LdapError),
}

impl DirectoryError {
    pub fn timeout(phase: &'static str, after: Duration) -> Self {
        Self::Timeout {
            phase,
            after_ms: after.as_millis() as u64,
        }
    }
}

/// Opens connections to a directory endpoint
#[async_trait]
pub trait DirectoryTransport: Send + Sync {
    type Connection: DirectoryConnection;

    /// Open one connection to `url`. Must not retry.
    async fn open(
        &self,
        url: &str,
        connect_timeout: Duration,
    ) -> Result<Self::Connection, DirectoryError>;
}

/// An open directory session
#[async_trait]
pub trait DirectoryConnection: Send + 'static {
    async fn simple_bind(
        &mut self,
        principal: &str,
        secret: &str,
        read_timeout: Duration,
    ) -> Result<(), DirectoryError>;

    /// Send an unbind and release the session
    async fn unbind(&mut self) -> Result<(), DirectoryError>;
}

// ============================================================================
// ldap3 implementation
// ============================================================================

/// Transport backed by `ldap3` (LDAP, LDAPS via rustls, ldapi)
#[derive(Debug, Clone, Copy, Default)]
pub struct Ldap3Transport;

#[async_trait]
impl DirectoryTransport for Ldap3Transport {
    type Connection = LdapSession;

    async fn open(&self, url: &str, connect_timeout: Duration) -> Result<LdapSession, DirectoryError> {
        let settings = LdapConnSettings::new().set_conn_timeout(connect_timeout);

        debug!("Connecting to LDAP server: {}", url);

        let (conn, ldap) = LdapConnAsync::with_settings(settings, url)
            .await
            .map_err(|e| DirectoryError::Connect(e.to_string()))?;

        // Driver exits once every Ldap handle is dropped
        ldap3::drive!(conn);

        Ok(LdapSession { ldap })
    }
}

/// Live `ldap3` session
pub struct LdapSession {
    ldap: Ldap,
}

impl LdapSession {
    pub fn ldap(&self) -> &Ldap {
        &self.ldap
    }

    /// Handle for issuing searches on the bound session
    pub fn ldap_mut(&mut self) -> &mut Ldap {
        &mut self.ldap
    }
}

#[async_trait]
impl DirectoryConnection for LdapSession {
    async fn simple_bind(
        &mut self,
        principal: &str,
        secret: &str,
        read_timeout: Duration,
    ) -> Result<(), DirectoryError> {
        let result = self
            .ldap
            .with_timeout(read_timeout)
            .simple_bind(principal, secret)
            .await?;

        if result.rc != 0 {
            return Err(DirectoryError::BindRejected {
                rc: result.rc,
                text: result.text,
            });
        }

        Ok(())
    }

    async fn unbind(&mut self) -> Result<(), DirectoryError> {
        self.ldap.unbind().await?;
        Ok(())
    }
}
