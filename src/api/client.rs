use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use http::header::AUTHORIZATION;
use http::Method;
use reqwest::{redirect, Client, Request, Response};
use serde_json::Value;
use tracing::{debug, info};

use crate::api::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::api::params::HttpParams;
use crate::auth::TokenProvider;
use crate::config::settings::SettingsConfig;
use crate::config::store::ConfigStore;
use crate::error::ApiError;
use crate::utils::constants::{ERRNO_KEY, LOGS_KEY};

/// Executes authenticated calls against `<prelude_url>/api`.
#[derive(Debug)]
pub struct ApiClient<S, D = TracingSink> {
    provider: TokenProvider<S>,
    client: Client,
    redirect_client: Client,
    diagnostics: Arc<D>,
}

impl<S: ConfigStore> ApiClient<S, TracingSink> {
    pub fn new(provider: TokenProvider<S>, settings: &SettingsConfig) -> Result<Self, ApiError> {
        Self::with_diagnostics(provider, settings, Arc::new(TracingSink))
    }
}

impl<S: ConfigStore, D: DiagnosticSink> ApiClient<S, D> {
    pub fn with_diagnostics(
        provider: TokenProvider<S>,
        settings: &SettingsConfig,
        diagnostics: Arc<D>,
    ) -> Result<Self, ApiError> {
        let client = build_client(settings, redirect::Policy::none())?;
        let redirect_client = build_client(settings, redirect::Policy::default())?;
        Ok(Self { provider, client, redirect_client, diagnostics })
    }

    pub fn provider(&self) -> &TokenProvider<S> {
        &self.provider
    }

    /// Send one request and return the validated raw response text.
    ///
    /// Fails when no valid token is cached, on transport errors, on a status
    /// code above 400 and when an entry of the top-level `logs` array carries
    /// an `errno`. Only transport and `logs` failures reach the diagnostic sink.
    pub async fn send_http_request(
        &self,
        method: Method,
        resource: &str,
        http_params: HttpParams,
    ) -> Result<String, ApiError> {
        let config = self
            .provider
            .store()
            .get_config()
            .await
            .map_err(|e| ApiError::Config(e.to_string()))?;
        let url = resource_url(&config.api_base_url(), resource);

        let Some(access_token) = self.provider.get_current_access_token().await else {
            debug!("no access token, request to '{}' not sent", url);
            return Err(ApiError::MissingToken);
        };

        let params = HttpParams::merge(HttpParams::defaults(&access_token)?, http_params).strip_empty();
        if let Err(err) = params.validate() {
            self.record_transport(&err, format!("{} {}", method, url), None);
            return Err(err);
        }

        let client = if params.allow_redirects.unwrap_or(false) {
            &self.redirect_client
        } else {
            &self.client
        };

        let request = match build_request(client, method.clone(), &url, params) {
            Ok(request) => request,
            Err(e) => {
                let err = ApiError::Transport(e.to_string());
                self.record_transport(&err, format!("{} {}", method, url), None);
                return Err(err);
            }
        };
        let request_dump = dump_request(&request);

        let response = match client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::Transport(e.to_string());
                self.record_transport(&err, request_dump, None);
                return Err(err);
            }
        };

        let status = response.status();
        debug!(
            status = status.as_u16(),
            reason = status.canonical_reason().unwrap_or_default(),
            version = ?response.version(),
            "prelude response"
        );
        if status.as_u16() > 400 {
            return Err(ApiError::HttpStatus(status));
        }

        let response_dump = dump_response_head(&response);
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let err = ApiError::Transport(e.to_string());
                self.record_transport(&err, request_dump, Some(response_dump));
                return Err(err);
            }
        };

        if let Some(logs) = find_embedded_errors(&text) {
            info!("prelude reported errors for {} {}", method, url);
            self.diagnostics.record(Diagnostic::Application { logs: logs.clone() });
            return Err(ApiError::Application { logs });
        }

        Ok(text)
    }

    fn record_transport(&self, err: &ApiError, request: String, response: Option<String>) {
        self.diagnostics.record(Diagnostic::Transport {
            error: err.to_string(),
            request,
            response,
        });
    }
}

/// The `logs` array of a response body when any entry carries a non-null `errno`.
pub fn find_embedded_errors(text: &str) -> Option<Value> {
    let parsed: Value = serde_json::from_str(text).ok()?;
    let logs = parsed.get(LOGS_KEY)?;
    let entries = logs.as_array()?;
    entries
        .iter()
        .any(|entry| entry.get(ERRNO_KEY).is_some_and(|errno| !errno.is_null()))
        .then(|| logs.clone())
}

pub fn resource_url(base_url: &str, resource: &str) -> String {
    let resource = resource.trim_start_matches('/');
    if resource.is_empty() {
        base_url.to_owned()
    } else {
        format!("{}/{}", base_url, resource)
    }
}

fn build_client(settings: &SettingsConfig, policy: redirect::Policy) -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
        .timeout(Duration::from_millis(settings.request_timeout_ms))
        .redirect(policy)
        .build()
        .map_err(|e| ApiError::Config(format!("cannot build http client: {}", e)))
}

fn build_request(client: &Client, method: Method, url: &str, params: HttpParams) -> reqwest::Result<Request> {
    let mut builder = client.request(method, url).query(&params.query_pairs());
    if let Some(headers) = params.headers {
        builder = builder.headers(headers);
    }
    if let Some(body) = params.body {
        builder = builder.body(body);
    }
    if let Some(json) = &params.json {
        builder = builder.json(json);
    }
    builder.build()
}

fn dump_request(request: &Request) -> String {
    let mut dump = format!("{} {}", request.method(), request.url());
    for (name, value) in request.headers() {
        let value = if name == AUTHORIZATION {
            "Bearer ***"
        } else {
            value.to_str().unwrap_or("<binary>")
        };
        let _ = write!(dump, "\n{}: {}", name, value);
    }
    if let Some(bytes) = request.body().and_then(|body| body.as_bytes()) {
        let _ = write!(dump, "\n\n{}", String::from_utf8_lossy(bytes));
    }
    dump
}

fn dump_response_head(response: &Response) -> String {
    let status = response.status();
    let mut dump = format!(
        "{:?} {} {}",
        response.version(),
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    );
    for (name, value) in response.headers() {
        let _ = write!(dump, "\n{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
    dump
}
