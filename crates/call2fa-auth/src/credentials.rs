//! API credentials
//!
//! The login/password pair is handed to the client once and kept for the
//! client's lifetime so the token guard can re-authenticate on its own. The
//! password is held in a [`Secret`] so it never shows up in `Debug` output or
//! log fields, and its buffer is wiped on drop.

use std::fmt;

use serde::{Deserialize, Deserializer};
use zeroize::Zeroize;

/// Sensitive string, redacted in Debug/Display and zeroized on drop.
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the inner value (use sparingly)
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl Clone for Secret {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Secret)
    }
}

/// Login/password pair for the `/v1/auth/` exchange.
#[derive(Debug, Clone)]
pub struct Credentials {
    login: String,
    password: Secret,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: Secret) -> Self {
        Self {
            login: login.into(),
            password,
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password(&self) -> &Secret {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_redacts_debug_and_display() {
        let secret = Secret::new("hunter2");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(secret.to_string(), "[REDACTED]");
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("acme", Secret::new("hunter2"));
        let debug = format!("{creds:?}");
        assert!(debug.contains("acme"), "login should be visible, got: {debug}");
        assert!(!debug.contains("hunter2"), "password leaked: {debug}");
    }

    #[test]
    fn secret_deserializes_from_plain_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            password: Secret,
        }
        let w: Wrapper = serde_json::from_str(r#"{"password":"p@ss"}"#).unwrap();
        assert_eq!(w.password.expose(), "p@ss");
    }
}
