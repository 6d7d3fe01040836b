//! Client error types

use thiserror::Error;

/// Errors from API operations and configuration loading.
///
/// No variant is retried by the client. A failed operation leaves the client
/// usable: the next call starts from the same token state.
#[derive(Error, Debug)]
pub enum Error {
    #[error("authentication failed: {0}")]
    Auth(#[from] call2fa_auth::Error),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{operation} returned unexpected status {status}")]
    UnexpectedStatus { operation: &'static str, status: u16 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// HTTP status observed on whichever endpoint failed, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::UnexpectedStatus { status, .. } => Some(*status),
            Error::Auth(e) => e.status(),
            _ => None,
        }
    }
}

/// Result alias using client Error
pub type Result<T> = std::result::Result<T, Error>;
