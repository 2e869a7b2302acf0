//! Request parameters of the send primitive and their shallow merge.

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Parameters of one HTTP call. `None` means "key not supplied".
///
/// `body` and `json` are mutually exclusive once empty placeholders are stripped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpParams {
    pub allow_redirects: Option<bool>,
    /// url parameters
    pub query: Option<Map<String, Value>>,
    /// raw data to send in body
    pub body: Option<String>,
    /// json data to send in body
    pub json: Option<Value>,
    pub headers: Option<HeaderMap>,
}

impl HttpParams {
    /// `allow_redirects=false`, empty query, empty body and json placeholders,
    /// json content type and the bearer token.
    pub fn defaults(access_token: &str) -> Result<Self, ApiError> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", access_token))
            .map_err(|e| ApiError::InvalidRequest(format!("access token is not a valid header value: {}", e)))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, authorization);

        Ok(Self {
            allow_redirects: Some(false),
            query: Some(Map::new()),
            body: Some(String::new()),
            json: Some(Value::String(String::new())),
            headers: Some(headers),
        })
    }

    pub fn with_query(mut self, query: Map<String, Value>) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    pub fn with_allow_redirects(mut self, allow_redirects: bool) -> Self {
        self.allow_redirects = Some(allow_redirects);
        self
    }

    /// Shallow merge: every key present in `overrides` replaces the default
    /// value entirely. A supplied `headers` map is not combined with the
    /// default headers, it takes their place.
    pub fn merge(defaults: HttpParams, overrides: HttpParams) -> HttpParams {
        HttpParams {
            allow_redirects: overrides.allow_redirects.or(defaults.allow_redirects),
            query: overrides.query.or(defaults.query),
            body: overrides.body.or(defaults.body),
            json: overrides.json.or(defaults.json),
            headers: overrides.headers.or(defaults.headers),
        }
    }

    /// Drop every parameter whose value is the empty string.
    pub fn strip_empty(mut self) -> Self {
        if self.body.as_deref() == Some("") {
            self.body = None;
        }
        if matches!(&self.json, Some(Value::String(s)) if s.is_empty()) {
            self.json = None;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.body.is_some() && self.json.is_some() {
            return Err(ApiError::InvalidRequest("'body' and 'json' cannot be used together".to_owned()));
        }
        Ok(())
    }

    /// Query map flattened to url pairs. Strings are sent verbatim, nulls are
    /// skipped and any other value is json-encoded.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .iter()
            .flatten()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.to_owned(),
                    other => other.to_string(),
                };
                (k.to_owned(), value)
            })
            .collect()
    }
}
