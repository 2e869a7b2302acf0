use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failures of the OAuth client-credentials exchange.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth config error: {0}")]
    Config(String),
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token endpoint answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid token response: {0}")]
    InvalidResponse(String),
    #[error("token store error: {0}")]
    Store(String),
}

/// Coarse failure class of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Authentication,
    Transport,
    HttpStatus,
    Application,
}

/// Failures of an authenticated API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("api config error: {0}")]
    Config(String),
    #[error("no valid access token")]
    MissingToken,
    #[error(transparent)]
    Authentication(#[from] AuthError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http status {0}")]
    HttpStatus(StatusCode),
    #[error("prelude reported errors: {logs}")]
    Application { logs: Value },
    #[error("response is not valid json: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// A config-store failure counts as authentication: without the stored
    /// url and credentials no authenticated call can be made.
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Config(_) | ApiError::MissingToken | ApiError::Authentication(_) => {
                FailureKind::Authentication
            }
            ApiError::HttpStatus(_) => FailureKind::HttpStatus,
            ApiError::Application { .. } => FailureKind::Application,
            ApiError::InvalidRequest(_)
            | ApiError::Transport(_)
            | ApiError::Decode(_) => FailureKind::Transport,
        }
    }
}
