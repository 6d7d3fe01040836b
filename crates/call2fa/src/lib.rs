//! Call2FA API client
//!
//! Typed async bindings for the Call2FA voice-call authentication API:
//! standard "press 1" calls, pool calls, dictated-code calls and call status
//! lookups. Authentication is handled by `call2fa_auth::TokenGuard`; callers
//! never deal with the JWT unless they ask for it.
//!
//! ```no_run
//! # async fn run() -> call2fa::Result<()> {
//! let client = call2fa::Client::new(call2fa::Config::from_env()?)?;
//! let call = client.call("+380631010121", "https://example.test/post").await?;
//! println!("call id: {}", call.call_id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use call2fa_auth::{Authenticator, Credentials, Secret, Token, TokenGuard};
pub use client::Client;
pub use config::Config;
pub use error::{Error, Result};
pub use types::{CallResponse, CallStatus, PoolCallResponse};
