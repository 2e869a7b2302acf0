use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, info};

use crate::auth::oauth2::{exchange_client_credentials, ConnectParams, Credentials, ExchangeSettings};
use crate::cache::token::Token;
use crate::config::settings::SettingsConfig;
use crate::config::store::ConfigStore;
use crate::error::AuthError;
use crate::helpers::time::get_token_safety_margin_seconds;

/// Owns the client-credentials exchange and the current-token lifecycle.
///
/// The token lives in the [`ConfigStore`]; the provider only reads it and,
/// through [`TokenProvider::check_access_token`], replaces it when it is
/// absent or expired. Concurrent refreshes are not serialized: two callers
/// may both exchange and the last write wins.
#[derive(Debug)]
pub struct TokenProvider<S> {
    store: Arc<S>,
    client: Client,
    settings: ExchangeSettings,
}

impl<S> Clone for TokenProvider<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            client: self.client.clone(),
            settings: self.settings,
        }
    }
}

impl<S: ConfigStore> TokenProvider<S> {
    pub fn new(store: Arc<S>, settings: &SettingsConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .build()
            .map_err(|e| AuthError::Config(format!("cannot build http client: {}", e)))?;
        Ok(Self::with_client(store, client, settings))
    }

    pub fn with_client(store: Arc<S>, client: Client, settings: &SettingsConfig) -> Self {
        let settings = ExchangeSettings {
            safety_margin_seconds: get_token_safety_margin_seconds(settings.safety_margin_seconds),
            default_token_ttl_seconds: settings.default_token_ttl_seconds,
        };
        Self { store, client, settings }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Perform the OAuth exchange and store the new token. Never retried.
    pub async fn connect(&self, params: ConnectParams) -> Result<Token, AuthError> {
        let config = self
            .store
            .get_config()
            .await
            .map_err(|e| AuthError::Config(e.to_string()))?;
        let credentials = Credentials::resolve(&config, params);

        let token = exchange_client_credentials(&self.client, &credentials, self.settings)
            .await
            .inspect_err(|e| error!("prelude authentication failed: {}", e))?;

        self.store
            .store_access_token(token.clone())
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        info!("access token stored, expires at {}", token.exp_unix_ts);
        Ok(token)
    }

    /// Cached bearer string, `None` when absent or expired.
    pub async fn get_current_access_token(&self) -> Option<String> {
        self.store.get_current_access_token().await
    }

    /// Return a valid bearer string, exchanging credentials only when none is cached.
    pub async fn check_access_token(&self) -> Result<String, AuthError> {
        if let Some(token) = self.get_current_access_token().await {
            debug!("cached access token is valid");
            return Ok(token);
        }
        info!("access token absent or expired, connecting");
        self.connect(ConnectParams::default()).await.map(|token| token.value)
    }
}
