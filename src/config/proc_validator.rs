//! Configuration validation with aggregated errors.
//! - prelude url is an absolute http(s) url
//! - credentials are present
//! - timeouts and token lifetime are positive
//! - logging level is one of the known levels

use tracing::{error, info};

use crate::config::settings::{PreludeConfig, ServiceConfig, SettingsConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_prelude(&cfg.prelude, &mut errors);
    validate_settings(&cfg.settings, &mut errors);

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        for e in &errors {
            error!("config: {}", e);
        }
        Err(errors)
    }
}

fn validate_prelude(prelude: &PreludeConfig, errors: &mut Vec<String>) {
    match reqwest::Url::parse(&prelude.prelude_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "prelude.url: unsupported scheme '{}', expected http or https",
            url.scheme()
        )),
        Err(e) => errors.push(format!("prelude.url: '{}' is not a valid url: {}", prelude.prelude_url, e)),
    }
    if prelude.client_id.trim().is_empty() {
        errors.push("prelude.client_id: must not be empty".to_string());
    }
    if prelude.client_secret.trim().is_empty() {
        errors.push("prelude.client_secret: must not be empty".to_string());
    }
    if !prelude.token_path.starts_with('/') {
        errors.push(format!("prelude.token_path: '{}' must start with '/'", prelude.token_path));
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.connect_timeout_ms == 0 {
        errors.push("settings.connect_timeout_ms: must be > 0".to_string());
    }
    if settings.request_timeout_ms == 0 {
        errors.push("settings.request_timeout_ms: must be > 0".to_string());
    }
    if settings.default_token_ttl_seconds == 0 {
        errors.push("settings.default_token_ttl_seconds: must be > 0".to_string());
    }
    if let Some(path) = &settings.token_state_path {
        if path.trim().is_empty() {
            errors.push("settings.token_state_path: must not be empty when set".to_string());
        }
    }
    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level: '{}' is not one of {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }
}
