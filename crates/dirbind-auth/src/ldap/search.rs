//! Bound directory session handed to callers after a successful bind

use crate::ldap::transport::{DirectoryConnection, DirectoryError, LdapSession};
use tracing::debug;

/// A directory connection that has completed its bind.
///
/// Only [`LdapSearchFactory`](crate::ldap::LdapSearchFactory) creates these.
/// The handle owns the connection; dropping it releases the session, and
/// [`close`](Self::close) sends an unbind first.
pub struct SearchHandle<C = LdapSession> {
    connection: C,
    principal: String,
}

impl<C: DirectoryConnection> SearchHandle<C> {
    pub(crate) fn new(connection: C, principal: impl Into<String>) -> Self {
        Self {
            connection,
            principal: principal.into(),
        }
    }

    /// Principal the connection is bound as
    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    pub async fn close(mut self) -> Result<(), DirectoryError> {
        debug!("Releasing LDAP connection for principal {}", self.principal);
        self.connection.unbind().await
    }
}
