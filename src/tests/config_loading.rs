#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use crate::config::proc_loader::{expand_env_vars, file_to_config, parse_config};
    use crate::config::settings::LogFormat;
    use crate::utils::logging::{resolve, LogLevel};

    const VALID_YAML: &str = r#"
prelude:
  url: https://prelude.example.org/
  client_id: glpi
  client_secret: secret
settings:
  request_timeout_ms: 3000
  logging:
    level: debug
    format: json
"#;

    #[test]
    fn valid_config_gets_defaults() {
        let cfg = parse_config(VALID_YAML.to_owned()).unwrap();

        assert_eq!(cfg.prelude.api_base_url(), "https://prelude.example.org/api");
        assert_eq!(cfg.prelude.token_url(), "https://prelude.example.org/oauth/token");
        assert_eq!(cfg.settings.request_timeout_ms, 3000);
        assert_eq!(cfg.settings.connect_timeout_ms, 5000);
        assert_eq!(cfg.settings.safety_margin_seconds, Some(10));
        assert_eq!(cfg.settings.default_token_ttl_seconds, 3600);
        assert_eq!(cfg.settings.logging.as_ref().unwrap().format, LogFormat::Json);
    }

    #[test]
    fn minimal_config_without_settings() {
        let yaml = "prelude:\n  url: http://localhost:8080\n  client_id: a\n  client_secret: b\n  token_path: /auth/token\n  scope: read\n";
        let cfg = parse_config(yaml.to_owned()).unwrap();

        assert_eq!(cfg.prelude.token_url(), "http://localhost:8080/auth/token");
        assert_eq!(cfg.prelude.scope.as_deref(), Some("read"));
        assert_eq!(cfg.settings.logging.as_ref().unwrap().level, "info");
    }

    #[test]
    fn invalid_config_reports_all_errors() {
        let yaml = r#"
prelude:
  url: ftp://prelude
  client_id: ""
  client_secret: " "
  token_path: oauth/token
settings:
  connect_timeout_ms: 0
  logging:
    level: loud
"#;
        let err = parse_config(yaml.to_owned()).unwrap_err().to_string();

        assert!(err.contains("config is not valid"));
        for field in [
            "prelude.url",
            "prelude.client_id",
            "prelude.client_secret",
            "prelude.token_path",
            "settings.connect_timeout_ms",
            "settings.logging.level",
        ] {
            assert!(err.contains(field), "missing '{}' in {}", field, err);
        }
    }

    #[test]
    fn cli_log_level_overrides_config() {
        let cfg = parse_config(VALID_YAML.to_owned()).unwrap();

        assert_eq!(resolve(&cfg, None).level, "debug");
        let resolved = resolve(&cfg, Some(LogLevel::WARN));
        assert_eq!(resolved.level, "warn");
        assert_eq!(resolved.format, LogFormat::Json);
    }

    #[test]
    #[serial]
    fn env_vars_are_expanded_with_defaults() {
        std::env::set_var("PRELUDE_TEST_SECRET", "from-env");
        std::env::remove_var("PRELUDE_TEST_MISSING");

        let out = expand_env_vars("a: ${PRELUDE_TEST_SECRET}\nb: ${PRELUDE_TEST_MISSING:fallback}\nc: ${PRELUDE_TEST_MISSING}");

        assert_eq!(out, "a: from-env\nb: fallback\nc: ");
        std::env::remove_var("PRELUDE_TEST_SECRET");
    }

    #[tokio::test]
    #[serial]
    async fn config_file_is_loaded_with_env_credentials() {
        std::env::set_var("PRELUDE_TEST_CLIENT_SECRET", "vault-secret");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "prelude:\n  url: https://prelude.local\n  client_id: glpi\n  client_secret: ${{PRELUDE_TEST_CLIENT_SECRET}}\n"
        )
        .unwrap();

        let cfg = file_to_config(file.path()).await.unwrap();

        assert_eq!(cfg.prelude.client_secret, "vault-secret");
        std::env::remove_var("PRELUDE_TEST_CLIENT_SECRET");
    }

    #[tokio::test]
    async fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = file_to_config(&dir.path().join("absent.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("cannot read config"));
    }
}
