//! Shared constants and defaults

pub const SAFETY_MARGIN_SECONDS_DEFAULT: u64 = 10;
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10000;
pub const DEFAULT_TOKEN_PATH: &str = "/oauth/token";

/// Suffix appended to the trimmed prelude url.
pub const API_SUFFIX: &str = "/api";
/// Key of the embedded diagnostics array in API responses.
pub const LOGS_KEY: &str = "logs";
/// Field marking an embedded application error.
pub const ERRNO_KEY: &str = "errno";

pub const STATUS_LABEL_ACCESS_TOKEN: &str = "Prelude access token";
pub const STATUS_LABEL_ALERTS: &str = "Prelude alerts";
pub const STATUS_LABEL_LOGS: &str = "Prelude logs";
