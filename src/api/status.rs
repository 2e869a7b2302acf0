use serde::Serialize;
use tracing::info;

use crate::api::client::ApiClient;
use crate::api::diagnostics::DiagnosticSink;
use crate::api::params::HttpParams;
use crate::config::store::ConfigStore;
use crate::utils::constants::{STATUS_LABEL_ACCESS_TOKEN, STATUS_LABEL_ALERTS, STATUS_LABEL_LOGS};

/// Health of the token and of each endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub access_token: bool,
    pub alerts: bool,
    pub logs: bool,
}

impl ServiceStatus {
    /// label -> status, in display order
    pub fn labels(&self) -> [(&'static str, bool); 3] {
        [
            (STATUS_LABEL_ACCESS_TOKEN, self.access_token),
            (STATUS_LABEL_ALERTS, self.alerts),
            (STATUS_LABEL_LOGS, self.logs),
        ]
    }

    pub fn is_healthy(&self) -> bool {
        self.labels().iter().all(|(_, ok)| *ok)
    }
}

impl<S: ConfigStore, D: DiagnosticSink> ApiClient<S, D> {
    /// The token is inspected before the endpoint checks, which may refresh it.
    pub async fn status(&self) -> ServiceStatus {
        let access_token = self.provider().get_current_access_token().await.is_some();
        let alerts = self
            .get_alerts(HttpParams::default())
            .await
            .is_ok_and(|v| v.is_object() || v.is_array());
        let logs = self
            .get_logs(HttpParams::default())
            .await
            .is_ok_and(|v| v.is_object() || v.is_array());

        let status = ServiceStatus { access_token, alerts, logs };
        info!(?status, "prelude status");
        status
    }

    pub async fn global_status(&self) -> bool {
        self.status().await.is_healthy()
    }
}
