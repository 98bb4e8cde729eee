//! Error types for Dirbind

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read config: {0}")]
    ConfigRead(String),

    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    #[error("Invalid directory URL: {0}")]
    InvalidUrl(String),
}
