//! Call2FA API constants

use std::time::Duration;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api-call2fa-v2.rikkicom.io";

/// Login exchange path, relative to the base URL.
pub const AUTH_PATH: &str = "/v1/auth/";

/// Tokens expiring within this window are renewed before use, so a token
/// cannot lapse while the request that follows the check is in flight.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(5 * 60);
