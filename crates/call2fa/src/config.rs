//! Client configuration
//!
//! Precedence: env vars > config file > defaults. Credentials can live in the
//! TOML file, but `CALL2FA_API_LOGIN` / `CALL2FA_API_PASSWORD` override them
//! so the password never has to be written to disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use call2fa_auth::{Credentials, DEFAULT_BASE_URL, DEFAULT_REFRESH_MARGIN, Secret};
use serde::Deserialize;

use crate::error::{Error, Result};

pub const ENV_LOGIN: &str = "CALL2FA_API_LOGIN";
pub const ENV_PASSWORD: &str = "CALL2FA_API_PASSWORD";
pub const ENV_BASE_URL: &str = "CALL2FA_BASE_URL";
pub const ENV_CONFIG_PATH: &str = "CALL2FA_CONFIG";

/// Root configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// Endpoint and transport settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Renew the token when it expires within this many seconds
    #[serde(default = "default_refresh_margin")]
    pub refresh_margin_secs: u64,
}

/// API login and password
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: Option<Secret>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_refresh_margin() -> u64 {
    DEFAULT_REFRESH_MARGIN.as_secs()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            refresh_margin_secs: default_refresh_margin(),
        }
    }
}

impl Config {
    /// Defaults plus the given credentials.
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            api: ApiConfig::default(),
            credentials: CredentialsConfig {
                login: login.into(),
                password: Some(Secret::new(password)),
            },
        }
    }

    /// Point the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with environment variables only.
    pub fn from_env() -> Result<Self> {
        let mut config = Config {
            api: ApiConfig::default(),
            credentials: CredentialsConfig::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(login) = std::env::var(ENV_LOGIN) {
            self.credentials.login = login;
        }
        if let Ok(password) = std::env::var(ENV_PASSWORD) {
            self.credentials.password = Some(Secret::new(password));
        }
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            self.api.base_url = base_url;
        }
    }

    /// Check the settings a client cannot work without.
    pub fn validate(&self) -> Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than 0".into()));
        }

        if self.credentials.login.trim().is_empty() {
            return Err(Error::Config(format!(
                "login is required (set credentials.login or {ENV_LOGIN})"
            )));
        }

        match &self.credentials.password {
            Some(p) if !p.is_empty() => Ok(()),
            _ => Err(Error::Config(format!(
                "password is required (set credentials.password or {ENV_PASSWORD})"
            ))),
        }
    }

    /// Credentials for the token guard. Fails if either half is missing.
    pub fn credentials(&self) -> Result<Credentials> {
        self.validate()?;
        let password = self
            .credentials
            .password
            .clone()
            .ok_or_else(|| Error::Config("password is required".into()))?;
        Ok(Credentials::new(self.credentials.login.clone(), password))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn refresh_margin(&self) -> Duration {
        Duration::from_secs(self.api.refresh_margin_secs)
    }

    /// Resolve config file path from an explicit argument or CALL2FA_CONFIG.
    pub fn resolve_path(explicit: Option<&str>) -> PathBuf {
        if let Some(p) = explicit {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            return PathBuf::from(p);
        }
        PathBuf::from("call2fa.toml")
    }
}
