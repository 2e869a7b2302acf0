use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::cache::token::Token;
use crate::config::settings::PreludeConfig;
use crate::error::AuthError;

const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

/// Caller-supplied overrides merged over the stored credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectParams {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub scope: Option<String>,
    pub token_url: Option<String>,
}

/// Credentials resolved for one exchange.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: Option<String>,
}

impl Credentials {
    pub fn resolve(config: &PreludeConfig, params: ConnectParams) -> Self {
        Self {
            token_url: params.token_url.unwrap_or_else(|| config.token_url()),
            client_id: params.client_id.unwrap_or_else(|| config.client_id.to_owned()),
            client_secret: params.client_secret.unwrap_or_else(|| config.client_secret.to_owned()),
            scope: params.scope.or_else(|| config.scope.to_owned()),
        }
    }

    fn form(&self) -> HashMap<&'static str, &str> {
        let mut form = HashMap::new();
        form.insert("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS);
        form.insert("client_id", self.client_id.as_str());
        form.insert("client_secret", self.client_secret.as_str());
        if let Some(scope) = &self.scope {
            form.insert("scope", scope.as_str());
        }
        form
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
pub struct ExchangeSettings {
    pub safety_margin_seconds: u64,
    pub default_token_ttl_seconds: u64,
}

/// Client-credentials grant: form POST, JSON token response.
pub async fn exchange_client_credentials(
    client: &Client,
    credentials: &Credentials,
    settings: ExchangeSettings,
) -> Result<Token, AuthError> {
    debug!("oauth2 exchange, url '{}', client_id '{}'", credentials.token_url, credentials.client_id);
    let response = client
        .post(&credentials.token_url)
        .form(&credentials.form())
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(AuthError::Status { status, body });
    }

    let parsed: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| AuthError::InvalidResponse(format!("token response is not json: {}", e)))?;

    if let Some(token_type) = parsed.token_type.as_deref() {
        if !token_type.eq_ignore_ascii_case("bearer") {
            return Err(AuthError::InvalidResponse(format!("unsupported token_type '{}'", token_type)));
        }
    }

    let value = parsed
        .access_token
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AuthError::InvalidResponse("access_token is missing".to_owned()))?;
    let expires_in = parsed.expires_in.unwrap_or(settings.default_token_ttl_seconds);

    info!("oauth2 exchange succeeded, expires_in {}s", expires_in);
    Ok(Token::from_expires_in(value, expires_in, settings.safety_margin_seconds))
}
