//! Call2FA API client
//!
//! Every operation first asks the [`TokenGuard`] for a valid token, then sends
//! its own request with `Authorization: Bearer <jwt>`. The guard's lock is
//! already released by the time the business request goes out, so concurrent
//! calls on a shared client only ever wait on each other during a renewal.
//!
//! Call-creating endpoints answer `201 Created`; the status lookup answers
//! `200 OK`. Any other status is returned as [`Error::UnexpectedStatus`].

use std::sync::Arc;

use call2fa_auth::{Authenticator, HttpAuthenticator, Token, TokenGuard};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{
    CallRequest, CallResponse, CallStatus, DictateCodeCallRequest, PoolCallRequest,
    PoolCallResponse,
};

pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    guard: TokenGuard,
}

impl Client {
    /// Build a client that authenticates against `{base_url}/v1/auth/`.
    ///
    /// No request is made here; the first operation obtains the token.
    pub fn new(config: Config) -> Result<Self> {
        let http = build_http_client(&config)?;
        let authenticator = Arc::new(HttpAuthenticator::new(http.clone(), &config.api.base_url));
        Self::assemble(config, http, authenticator)
    }

    /// Build a client with a custom login exchange.
    pub fn with_authenticator(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self> {
        let http = build_http_client(&config)?;
        Self::assemble(config, http, authenticator)
    }

    fn assemble(
        config: Config,
        http: reqwest::Client,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self> {
        let credentials = config.credentials()?;
        let base_url = Url::parse(&config.api.base_url)
            .map_err(|e| Error::Config(format!("invalid base_url {}: {e}", config.api.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base_url cannot carry a path: {}",
                config.api.base_url
            )));
        }

        let guard =
            TokenGuard::new(credentials, authenticator).with_margin(config.refresh_margin());

        Ok(Self {
            http,
            base_url,
            guard,
        })
    }

    pub fn guard(&self) -> &TokenGuard {
        &self.guard
    }

    /// Run the login exchange now, replacing any held token. Concurrent
    /// calls share one exchange.
    pub async fn authenticate(&self) -> Result<Token> {
        Ok(self.guard.renew().await?)
    }

    /// A token valid beyond the refresh margin, renewed if needed.
    pub async fn token(&self) -> Result<Token> {
        Ok(self.guard.ensure_valid().await?)
    }

    /// Standard "press 1 to authorize" call. The API posts the outcome to
    /// `callback_url`.
    pub async fn call(&self, phone_number: &str, callback_url: &str) -> Result<CallResponse> {
        let url = self.endpoint(&["v1", "call"])?;
        let request = self.http.post(url).json(&CallRequest {
            phone_number,
            callback_url,
        });
        self.send("call", request, StatusCode::CREATED).await
    }

    /// Call from a number in the given pool; the caller ID carries the code.
    pub async fn pool_call(&self, phone_number: &str, pool_id: &str) -> Result<PoolCallResponse> {
        let url = self.endpoint(&["v1", "pool", pool_id, "call"])?;
        let request = self.http.post(url).json(&PoolCallRequest { phone_number });
        self.send("pool_call", request, StatusCode::CREATED).await
    }

    /// Call and read `code` aloud in `lang` (e.g. "ru", "uk", "en").
    pub async fn dictate_code_call(
        &self,
        phone_number: &str,
        code: &str,
        lang: &str,
    ) -> Result<CallResponse> {
        let url = self.endpoint(&["v1", "code", "call"])?;
        let request = self.http.post(url).json(&DictateCodeCallRequest {
            phone_number,
            code,
            lang,
        });
        self.send("dictate_code_call", request, StatusCode::CREATED)
            .await
    }

    pub async fn call_status(&self, call_id: &str) -> Result<CallStatus> {
        let url = self.endpoint(&["v1", "call", call_id])?;
        let request = self.http.get(url);
        self.send("call_status", request, StatusCode::OK).await
    }

    /// `{base_url}/seg/seg/.../` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("base_url cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
        expected: StatusCode,
    ) -> Result<T> {
        let token = self.guard.ensure_valid().await?;

        let response = request
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| Error::Http(format!("{operation} request failed: {e}")))?;

        let status = response.status();
        metrics::counter!(
            "call2fa_requests_total",
            "operation" => operation,
            "status" => status.as_u16().to_string()
        )
        .increment(1);

        if status != expected {
            warn!(operation, status = status.as_u16(), "unexpected status from API");
            return Err(Error::UnexpectedStatus {
                operation,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Http(format!("reading {operation} response: {e}")))?;
        debug!(operation, bytes = body.len(), "API request succeeded");

        serde_json::from_slice(&body)
            .map_err(|e| Error::Serialization(format!("invalid {operation} response: {e}")))
    }
}

fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    config.validate()?;
    reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| Error::Http(format!("building HTTP client: {e}")))
}
