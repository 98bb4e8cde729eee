//! LDAP bind-based authentication
//!
//! Provides:
//! - Simple bind with caller-supplied credentials
//! - Fixed connect/read timeouts
//! - A single normalized failure for every connect or bind problem
//! - Bound connections exposed as search handles

mod factory;
mod search;
mod transport;
mod types;

#[cfg(test)]
mod fake;

pub use factory::{DirSearchFactory, LdapSearchFactory};
pub use search::SearchHandle;
pub use transport::{
    DirectoryConnection, DirectoryError, DirectoryTransport, Ldap3Transport, LdapSession,
};
pub use types::*;
