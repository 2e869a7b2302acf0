//! # Prelude API client
//!
//! Authenticates against a Prelude server with the OAuth client-credentials
//! grant, keeps the access token cached until it expires, and retrieves
//! alerts and logs through a single request pipeline that reports transport,
//! HTTP status and embedded application errors as one `Result`.
//!
//! Modules:
//! - `config` - YAML configuration, validation and the token store
//! - `cache` - access token value type
//! - `auth` - OAuth exchange and token lifecycle
//! - `api` - send primitive, alerts/logs retrieval, health status

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod helpers;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::api::{ApiClient, HttpParams, ServiceStatus};
pub use crate::auth::{ConnectParams, TokenProvider};
pub use crate::cache::token::Token;
pub use crate::config::settings::{PreludeConfig, ServiceConfig, SettingsConfig};
pub use crate::config::store::{ConfigStore, FileConfigStore, MemoryConfigStore};
pub use crate::error::{ApiError, AuthError, FailureKind};
