//! Alerts and logs retrieval.

use http::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::api::client::ApiClient;
use crate::api::diagnostics::DiagnosticSink;
use crate::api::params::HttpParams;
use crate::config::store::ConfigStore;
use crate::error::ApiError;

pub const ACTION_RETRIEVE: &str = "retrieve";
pub const DEFAULT_LIMIT: u64 = 100;
pub const DEFAULT_OFFSET: u64 = 0;

const ALERT_PATHS: [&str; 2] = ["alert.create_time", "alert.classification.text"];
const LOG_PATHS: [&str; 2] = ["log.timestamp", "log.host"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Alerts,
    Logs,
}

/// The nested `request` query value. Field order is part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub path: Vec<String>,
    pub limit: u64,
    pub offset: u64,
}

impl Resource {
    pub fn default_paths(&self) -> &'static [&'static str] {
        match self {
            Resource::Alerts => &ALERT_PATHS,
            Resource::Logs => &LOG_PATHS,
        }
    }

    pub fn default_request(&self) -> QueryRequest {
        QueryRequest {
            path: self.default_paths().iter().map(|p| p.to_string()).collect(),
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }

    pub fn default_query(&self) -> Map<String, Value> {
        retrieve_query(&self.default_request())
    }
}

/// `{action: "retrieve", request: {...}}` with the request still structured.
pub fn retrieve_query(request: &QueryRequest) -> Map<String, Value> {
    let mut query = Map::new();
    query.insert("action".to_owned(), Value::String(ACTION_RETRIEVE.to_owned()));
    query.insert("request".to_owned(), serde_json::json!(request));
    query
}

/// Shallow-merge caller params over the resource defaults, then encode the
/// `request` entry as a json string.
pub fn build_resource_params(resource: Resource, params: HttpParams) -> Result<HttpParams, ApiError> {
    let defaults = HttpParams::default().with_query(resource.default_query());
    let mut merged = HttpParams::merge(defaults, params);
    if let Some(request) = merged.query.as_mut().and_then(|query| query.get_mut("request")) {
        let encoded = serde_json::to_string(request)?;
        *request = Value::String(encoded);
    }
    Ok(merged)
}

impl<S: ConfigStore, D: DiagnosticSink> ApiClient<S, D> {
    pub async fn get_alerts(&self, params: HttpParams) -> Result<Value, ApiError> {
        self.get_resource(Resource::Alerts, params).await
    }

    pub async fn get_logs(&self, params: HttpParams) -> Result<Value, ApiError> {
        self.get_resource(Resource::Logs, params).await
    }

    async fn get_resource(&self, resource: Resource, params: HttpParams) -> Result<Value, ApiError> {
        self.provider().check_access_token().await?;

        let params = build_resource_params(resource, params)?;
        debug!("retrieving {:?}", resource);
        let text = self.send_http_request(Method::GET, "", params).await?;
        Ok(serde_json::from_str(&text)?)
    }
}
