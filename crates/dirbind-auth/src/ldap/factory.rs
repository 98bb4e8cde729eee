//! LDAP search factory
//!
//! Opens a connection to the configured directory, binds with the caller's
//! credentials and hands the bound connection back as a [`SearchHandle`].
//! Every failure collapses into [`AuthenticationFailure`].

use crate::error::AuthenticationFailure;
use crate::ldap::search::SearchHandle;
use crate::ldap::transport::{
    DirectoryConnection, DirectoryError, DirectoryTransport, Ldap3Transport,
};
use crate::ldap::types::{ConnectionConfig, Credentials};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// How long a detached unbind may run after a failed bind before the session is dropped
const RELEASE_GRACE: Duration = Duration::from_secs(1);

/// Produces bound search handles for an authentication provider
#[async_trait]
pub trait DirSearchFactory: Send + Sync {
    type Connection: DirectoryConnection;

    async fn create(
        &self,
        config: &ConnectionConfig,
        principal: &str,
        secret: &str,
    ) -> Result<SearchHandle<Self::Connection>, AuthenticationFailure>;
}

/// Factory for directory connections bound with user credentials.
///
/// Stateless: every call opens a fresh connection, so one factory can be
/// shared across tasks.
#[derive(Debug, Clone, Default)]
pub struct LdapSearchFactory<T = Ldap3Transport> {
    transport: T,
}

impl LdapSearchFactory {
    pub fn new() -> Self {
        Self {
            transport: Ldap3Transport,
        }
    }
}

impl<T: DirectoryTransport> LdapSearchFactory<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Connect to `config.url()` and simple-bind as `principal`.
    ///
    /// Makes exactly one attempt. Empty or malformed credentials are passed
    /// through to the directory unchanged.
    pub async fn create(
        &self,
        config: &ConnectionConfig,
        principal: &str,
        secret: &str,
    ) -> Result<SearchHandle<T::Connection>, AuthenticationFailure> {
        let credentials = Credentials::new(principal, secret);

        match self.bind(config, &credentials).await {
            Ok(connection) => Ok(SearchHandle::new(connection, credentials.principal())),
            Err(cause) => {
                error!(
                    "Could not connect to the LDAP server: authentication failed for principal {}: {}",
                    credentials.principal(),
                    cause
                );
                Err(AuthenticationFailure::new(credentials.principal(), cause))
            }
        }
    }

    async fn bind(
        &self,
        config: &ConnectionConfig,
        credentials: &Credentials,
    ) -> Result<T::Connection, DirectoryError> {
        info!(
            "Connecting using principal {} to ldap url {} ({} bind)",
            credentials.principal(),
            config.url(),
            config.bind_mode().as_str()
        );

        let mut connection = timeout(
            config.connect_timeout(),
            self.transport.open(config.url(), config.connect_timeout()),
        )
        .await
        .map_err(|_| DirectoryError::timeout("connect", config.connect_timeout()))??;

        let bound = timeout(
            config.read_timeout(),
            connection.simple_bind(
                credentials.principal(),
                credentials.secret(),
                config.read_timeout(),
            ),
        )
        .await
        .unwrap_or_else(|_| Err(DirectoryError::timeout("bind", config.read_timeout())));

        if let Err(e) = bound {
            release(connection);
            return Err(e);
        }

        debug!("Bound to {} as {}", config.url(), credentials.principal());
        Ok(connection)
    }
}

/// Unbind a connection whose bind failed, off the caller's clock.
///
/// The session closes when the task drops it, whether or not the unbind
/// finished within [`RELEASE_GRACE`].
fn release<C: DirectoryConnection>(mut connection: C) {
    tokio::spawn(async move {
        match timeout(RELEASE_GRACE, connection.unbind()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to unbind LDAP connection: {}", e),
            Err(_) => warn!("Timed out unbinding LDAP connection"),
        }
    });
}

#[async_trait]
impl<T: DirectoryTransport> DirSearchFactory for LdapSearchFactory<T> {
    type Connection = T::Connection;

    async fn create(
        &self,
        config: &ConnectionConfig,
        principal: &str,
        secret: &str,
    ) -> Result<SearchHandle<T::Connection>, AuthenticationFailure> {
        LdapSearchFactory::create(self, config, principal, secret).await
    }
}
