//! Error types for Call2FA authentication

/// Errors from the login exchange and token handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("auth endpoint returned unexpected status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("credentials rejected by auth endpoint ({status})")]
    InvalidCredentials { status: u16 },

    #[error("invalid token: {0}")]
    InvalidToken(String),
}

impl Error {
    /// HTTP status observed on the auth endpoint, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::UnexpectedStatus { status } | Error::InvalidCredentials { status } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_status_errors() {
        assert_eq!(Error::UnexpectedStatus { status: 500 }.status(), Some(500));
        assert_eq!(Error::InvalidCredentials { status: 401 }.status(), Some(401));
        assert_eq!(Error::Http("refused".into()).status(), None);
        assert_eq!(Error::InvalidToken("no exp".into()).status(), None);
    }

    #[test]
    fn display_includes_context() {
        let err = Error::InvalidCredentials { status: 403 };
        assert_eq!(err.to_string(), "credentials rejected by auth endpoint (403)");

        let err = Error::Http("connection refused".into());
        assert!(err.to_string().contains("connection refused"), "got: {err}");
    }
}
