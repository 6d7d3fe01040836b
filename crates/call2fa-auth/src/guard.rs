//! Token guard: lazy, single-flight token renewal
//!
//! The guard owns the credentials and the current token. Every API call asks
//! it for a token via [`TokenGuard::ensure_valid`]. A token is reused while
//! its expiry is more than the refresh margin away; otherwise the caller runs
//! the login exchange.
//!
//! A tokio Mutex guards only the check-and-renew section. Each caller notes
//! the renewal generation before it queues for the lock. If the generation
//! moved while it waited, another caller just renewed and the waiter takes
//! that token as long as it has not expired, even when the server issues
//! tokens shorter-lived than the margin. The lock is released before the
//! caller sends its business request, so unrelated traffic is never
//! serialized behind it. A failed renewal leaves the previous token and the
//! generation in place; the next caller to get the lock tries again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::constants::DEFAULT_REFRESH_MARGIN;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::exchange::Authenticator;
use crate::token::{Token, unix_now};

pub struct TokenGuard {
    credentials: Credentials,
    authenticator: Arc<dyn Authenticator>,
    margin: Duration,
    token: Mutex<Option<Token>>,
    /// Bumped under the lock each time a new token is stored
    generation: AtomicU64,
}

impl TokenGuard {
    /// Create a guard with no token; the first [`ensure_valid`](Self::ensure_valid)
    /// performs the initial exchange.
    pub fn new(credentials: Credentials, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            credentials,
            authenticator,
            margin: DEFAULT_REFRESH_MARGIN,
            token: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Override the refresh margin (default 5 minutes).
    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    pub fn margin(&self) -> Duration {
        self.margin
    }

    /// Return a token that stays valid for longer than the margin, renewing
    /// it first if needed. A token renewed while this caller waited for the
    /// lock is returned as long as it has not expired.
    pub async fn ensure_valid(&self) -> Result<Token> {
        let seen = self.generation.load(Ordering::Acquire);
        let mut slot = self.token.lock().await;

        if let Some(token) = self.renewed_since(seen, &slot) {
            return Ok(token);
        }

        if let Some(token) = slot.as_ref() {
            if token.is_valid_at(unix_now(), self.margin) {
                debug!(expires_at = token.expires_at(), "reusing cached token");
                return Ok(token.clone());
            }
            debug!(expires_at = token.expires_at(), "token within refresh margin, renewing");
        } else {
            debug!("no token held, authenticating");
        }

        self.renew_locked(&mut slot).await
    }

    /// Run the login exchange and replace the held token, whatever its expiry.
    ///
    /// A caller that had to wait for another renewal to finish takes that
    /// renewal's token instead of exchanging again.
    pub async fn renew(&self) -> Result<Token> {
        let seen = self.generation.load(Ordering::Acquire);
        let mut slot = self.token.lock().await;

        if let Some(token) = self.renewed_since(seen, &slot) {
            return Ok(token);
        }

        self.renew_locked(&mut slot).await
    }

    /// Snapshot of the held token, without renewing.
    pub async fn current(&self) -> Option<Token> {
        self.token.lock().await.clone()
    }

    /// Install a token obtained elsewhere (e.g. restored from a cache).
    pub async fn install(&self, token: Token) {
        let mut slot = self.token.lock().await;
        *slot = Some(token);
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// The token stored since `seen` was read, if one was and it has not
    /// expired yet. Must be called with the lock held.
    fn renewed_since(&self, seen: u64, slot: &Option<Token>) -> Option<Token> {
        if self.generation.load(Ordering::Acquire) == seen {
            return None;
        }
        let token = slot
            .as_ref()
            .filter(|t| t.is_valid_at(unix_now(), Duration::ZERO))?;
        debug!(expires_at = token.expires_at(), "using token renewed while waiting");
        Some(token.clone())
    }

    async fn renew_locked(&self, slot: &mut Option<Token>) -> Result<Token> {
        let outcome = async {
            let raw = self.authenticator.authenticate(&self.credentials).await?;
            let token = Token::decode(raw)?;
            if !token.is_valid_at(unix_now(), Duration::ZERO) {
                return Err(Error::InvalidToken(format!(
                    "token already expired at {}",
                    token.expires_at()
                )));
            }
            Ok(token)
        }
        .await;

        match outcome {
            Ok(token) => {
                info!(
                    login = self.credentials.login(),
                    expires_at = token.expires_at(),
                    "token renewed"
                );
                metrics::counter!("call2fa_token_renewals_total", "outcome" => "success")
                    .increment(1);
                *slot = Some(token.clone());
                self.generation.fetch_add(1, Ordering::Release);
                Ok(token)
            }
            Err(e) => {
                warn!(login = self.credentials.login(), error = %e, "token renewal failed");
                metrics::counter!("call2fa_token_renewals_total", "outcome" => "failure")
                    .increment(1);
                Err(e)
            }
        }
    }
}
