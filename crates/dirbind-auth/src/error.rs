//! Error surfaced to callers of the search factory

use crate::ldap::DirectoryError;
use thiserror::Error;

/// A connect-and-bind attempt did not succeed.
///
/// The message names the attempted principal and nothing else, so an
/// unreachable server and a wrong password look the same to the caller.
/// The underlying [`DirectoryError`] is kept as the error source for
/// server-side logging.
#[derive(Debug, Error)]
#[error("Error validating LDAP user: authentication failed for principal '{principal}'")]
pub struct AuthenticationFailure {
    principal: String,
    #[source]
    cause: DirectoryError,
}

impl AuthenticationFailure {
    pub fn new(principal: impl Into<String>, cause: DirectoryError) -> Self {
        Self {
            principal: principal.into(),
            cause,
        }
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }
}
