//! JSON Web Token handling
//!
//! The API hands out a JWT from `/v1/auth/`. The client cannot verify the
//! signature (it has no key), it only needs the `exp` claim to know when to
//! renew. A [`Token`] is always built by decoding a raw string, so the claims
//! it carries are the claims of the exact token sent on the wire.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Claims read from the JWT payload. Only `exp` is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Expiry as unix seconds
    pub exp: u64,
    /// Issued-at as unix seconds
    #[serde(default)]
    pub iat: Option<u64>,
    /// Subject, usually the account the token was issued to
    #[serde(default)]
    pub sub: Option<String>,
}

/// A bearer token paired with its decoded claims.
///
/// Cheap to clone: the raw form is shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    raw: Arc<str>,
    claims: Claims,
}

impl Token {
    /// Decode a raw JWT. Fails if it is not three dot-separated segments, the
    /// payload is not base64url JSON, or it lacks a numeric `exp`.
    pub fn decode(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let mut segments = raw.split('.');
        let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => {
                return Err(Error::InvalidToken(
                    "expected three dot-separated segments".into(),
                ));
            }
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| Error::InvalidToken(format!("payload is not base64url: {e}")))?;
        let claims: Claims = serde_json::from_slice(&bytes)
            .map_err(|e| Error::InvalidToken(format!("payload claims: {e}")))?;

        Ok(Self {
            raw: raw.into(),
            claims,
        })
    }

    /// The encoded form, as sent in `Authorization: Bearer`.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Expiry as unix seconds.
    pub fn expires_at(&self) -> u64 {
        self.claims.exp
    }

    /// `now + margin < exp`, with `now` in unix seconds.
    pub fn is_valid_at(&self, now: u64, margin: Duration) -> bool {
        now.saturating_add(margin.as_secs()) < self.claims.exp
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("raw", &"[REDACTED]")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Current wall-clock time as unix seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
