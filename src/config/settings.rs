use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_TOKEN_PATH,
    DEFAULT_TOKEN_TTL_SECONDS,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub prelude: PreludeConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// ================================
/// Prelude endpoint and credentials
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PreludeConfig {
    #[serde(rename = "url")]
    pub prelude_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// joined to the trimmed prelude url
    #[serde(default = "default_token_path")]
    pub token_path: String,
    pub scope: Option<String>,
}

impl PreludeConfig {
    pub fn new(prelude_url: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            prelude_url: prelude_url.to_owned(),
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            token_path: default_token_path(),
            scope: None,
        }
    }

    /// `trim(prelude_url, '/') + "/api"`
    pub fn api_base_url(&self) -> String {
        format!("{}{}", self.trimmed_url(), crate::utils::constants::API_SUFFIX)
    }

    pub fn token_url(&self) -> String {
        format!("{}/{}", self.trimmed_url(), self.token_path.trim_start_matches('/'))
    }

    fn trimmed_url(&self) -> &str {
        self.prelude_url.trim_matches('/')
    }
}

/// ================================
/// Global settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// token is refreshed this many seconds before it expires
    pub safety_margin_seconds: Option<u64>,
    /// used when the token endpoint omits `expires_in`
    #[serde(default = "default_token_ttl_seconds")]
    pub default_token_ttl_seconds: u64,
    pub token_state_path: Option<String>,
    pub logging: Option<LoggingConfig>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            safety_margin_seconds: None,
            default_token_ttl_seconds: default_token_ttl_seconds(),
            token_state_path: None,
            logging: None,
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}

fn default_token_path() -> String {
    DEFAULT_TOKEN_PATH.to_owned()
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_token_ttl_seconds() -> u64 {
    DEFAULT_TOKEN_TTL_SECONDS
}
