//! Login exchange
//!
//! `POST /v1/auth/` with `{login, password}` answers `200 OK` and `{jwt}`.
//! The guard only sees the [`Authenticator`] trait, so tests and alternative
//! transports can stand in for the HTTP implementation.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::AUTH_PATH;
use crate::credentials::Credentials;
use crate::error::{Error, Result};

/// Boxed future returned by [`Authenticator::authenticate`].
pub type AuthFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Performs one login exchange and returns the raw JWT.
///
/// Uses `Pin<Box<dyn Future>>` for dyn-compatibility (`Arc<dyn Authenticator>`).
pub trait Authenticator: Send + Sync {
    fn authenticate<'a>(&'a self, credentials: &'a Credentials) -> AuthFuture<'a>;
}

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    login: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    jwt: String,
}

/// [`Authenticator`] backed by the real `/v1/auth/` endpoint.
#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    client: reqwest::Client,
    url: String,
}

impl HttpAuthenticator {
    /// `base_url` is the API root, e.g. `https://api-call2fa-v2.rikkicom.io`.
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}{AUTH_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn exchange(&self, credentials: &Credentials) -> Result<String> {
        debug!(url = %self.url, login = credentials.login(), "requesting token");

        let response = self
            .client
            .post(&self.url)
            .json(&AuthRequest {
                login: credentials.login(),
                password: credentials.password().expose(),
            })
            .send()
            .await
            .map_err(|e| Error::Http(format!("auth request failed: {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(status = status.as_u16(), "auth endpoint rejected login exchange");
            // 401/403 means the login/password pair is wrong
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return Err(Error::InvalidCredentials {
                    status: status.as_u16(),
                });
            }
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Http(format!("reading auth response: {e}")))?;
        let parsed: AuthResponse = serde_json::from_slice(&body)
            .map_err(|e| Error::Serialization(format!("invalid auth response: {e}")))?;
        Ok(parsed.jwt)
    }
}

impl Authenticator for HttpAuthenticator {
    fn authenticate<'a>(&'a self, credentials: &'a Credentials) -> AuthFuture<'a> {
        Box::pin(self.exchange(credentials))
    }
}
