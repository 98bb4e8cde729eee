//! Directory authentication for Dirbind

pub mod error;
pub mod ldap;

pub use error::AuthenticationFailure;
pub use ldap::{
    BindMode, ConnectionConfig, Credentials, DirSearchFactory, DirectoryError,
    LdapSearchFactory, SearchHandle, BIND_TIMEOUT,
};
