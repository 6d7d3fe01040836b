//! Call2FA authentication library
//!
//! Obtains and caches the JSON Web Token the Call2FA API requires on every
//! request. This crate has no knowledge of the business endpoints; the API
//! client in the `call2fa` crate asks the guard for a token before each call.
//!
//! Token flow:
//! 1. Client builds `TokenGuard::new()` with `Credentials` and an `Authenticator`
//! 2. Each API call runs `TokenGuard::ensure_valid()`
//! 3. No token, or one expiring within the margin: `Authenticator::authenticate()`
//!    posts to `/v1/auth/` and the returned JWT is decoded by `Token::decode()`
//! 4. The decoded token replaces the previous one; concurrent callers reuse it

pub mod constants;
pub mod credentials;
pub mod error;
pub mod exchange;
pub mod guard;
pub mod token;

pub use constants::*;
pub use credentials::{Credentials, Secret};
pub use error::{Error, Result};
pub use exchange::{AuthFuture, Authenticator, HttpAuthenticator};
pub use guard::TokenGuard;
pub use token::{Claims, Token, unix_now};
