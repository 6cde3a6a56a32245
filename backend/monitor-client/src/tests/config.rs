use crate::auth::AuthConfig;
use crate::config::{ClientConfig, DEFAULT_MAX_RETRIES, parse_base_url};
use crate::error::ConfigError;

use std::collections::HashMap;
use std::time::Duration;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

/// **VALUE**: Verifies the tri-state retry budget.
///
/// **WHY THIS MATTERS**: "not configured" and "explicitly zero" must not collapse into the
/// same value; zero disables retries while unset means the default.
///
/// **BUG THIS CATCHES**: Would catch `Some(0)` being treated as "use the default".
#[test]
fn given_retry_settings_when_computing_attempts_then_budget_is_tri_state() {
    let config = ClientConfig::new("https://api.example.com");

    assert_eq!(config.max_attempts(), DEFAULT_MAX_RETRIES + 1);
    assert_eq!(config.clone().with_max_retries(0).max_attempts(), 1);
    assert_eq!(config.clone().with_max_retries(5).max_attempts(), 6);
    assert_eq!(
        config.with_max_retries(1).with_default_retries().max_attempts(),
        4
    );
}

#[test]
fn given_non_http_base_url_when_parsed_then_invalid_url() {
    for raw in ["", "   ", "ftp://files.example.com", "not a url", "unix:/tmp/sock"] {
        let err = parse_base_url(raw).expect_err(raw);
        assert!(
            matches!(err, ConfigError::InvalidUrl { .. }),
            "{raw:?} gave {err:?}"
        );
    }
}

#[test]
fn given_base_url_with_path_when_parsed_then_path_is_kept() {
    let url = parse_base_url(" https://api.example.com/monitor ").expect("valid url");
    assert_eq!(url.as_str(), "https://api.example.com/monitor");
}

#[test]
fn given_inverted_retry_delays_when_validated_then_validation_error() {
    let config = ClientConfig::new("https://api.example.com")
        .with_retry_delays(Duration::from_secs(5), Duration::from_secs(1));

    let err = config.validate().expect_err("inverted delays");

    assert!(err.to_string().contains("retry_initial_delay"));
}

#[test]
fn given_zero_timeout_when_validated_then_validation_error() {
    let config = ClientConfig::new("https://api.example.com").with_timeout(Duration::ZERO);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

/// **VALUE**: Verifies a full TOML document, including a tagged auth table and
/// humantime durations.
#[test]
fn given_toml_document_when_parsed_then_all_fields_are_read() {
    // GIVEN
    let toml = r#"
base_url = "https://api.example.com"
max_retries = 0
debug = true
timeout = "10s"
retry_initial_delay = "50ms"
retry_max_delay = "1s"

[auth]
scheme = "api_key"
key = "k-1"
secret = "s-1"
"#;

    // WHEN
    let config = ClientConfig::from_toml_str(toml).expect("valid toml");

    // THEN
    assert_eq!(config.max_retries, Some(0));
    assert_eq!(config.max_attempts(), 1);
    assert!(config.debug);
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    assert_eq!(config.retry_initial_delay, Duration::from_millis(50));
    assert_eq!(config.retry_max_delay, Duration::from_secs(1));
    assert_eq!(config.auth, AuthConfig::api_key("k-1", "s-1"));
}

#[test]
fn given_minimal_toml_when_parsed_then_defaults_apply() {
    let config = ClientConfig::from_toml_str(r#"base_url = "http://localhost:8080""#)
        .expect("valid toml");

    assert_eq!(config.auth, AuthConfig::None);
    assert_eq!(config.max_retries, None);
    assert_eq!(config.timeout, None);
    assert!(!config.debug);
}

#[test]
fn given_unknown_key_in_toml_when_parsed_then_parse_error() {
    let err = ClientConfig::from_toml_str(
        r#"
base_url = "https://api.example.com"
retries = 2
"#,
    )
    .expect_err("unknown key");

    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn given_unknown_auth_scheme_when_parsed_then_parse_error() {
    let err = ClientConfig::from_toml_str(
        r#"
base_url = "https://api.example.com"

[auth]
scheme = "oauth"
"#,
    )
    .expect_err("unknown scheme");

    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn given_env_variables_when_loaded_then_config_is_built() {
    let lookup = lookup_from(&[
        ("MONITOR_BASE_URL", "https://api.example.com"),
        ("MONITOR_TOKEN", "tok"),
        ("MONITOR_MAX_RETRIES", "2"),
        ("MONITOR_TIMEOUT", "1m 30s"),
        ("MONITOR_DEBUG", "yes"),
    ]);

    let config = ClientConfig::from_lookup(lookup).expect("config");

    assert_eq!(config.auth, AuthConfig::token("tok"));
    assert_eq!(config.max_attempts(), 3);
    assert_eq!(config.timeout, Some(Duration::from_secs(90)));
    assert!(config.debug);
}

#[test]
fn given_missing_base_url_when_loaded_from_env_then_env_error() {
    let err = ClientConfig::from_lookup(lookup_from(&[("MONITOR_TOKEN", "tok")]))
        .expect_err("base url required");

    match err {
        ConfigError::EnvError { variable, .. } => assert_eq!(variable, "MONITOR_BASE_URL"),
        other => panic!("expected EnvError, got {other:?}"),
    }
}

#[test]
fn given_non_numeric_retries_when_loaded_from_env_then_env_error() {
    let err = ClientConfig::from_lookup(lookup_from(&[
        ("MONITOR_BASE_URL", "https://api.example.com"),
        ("MONITOR_MAX_RETRIES", "many"),
    ]))
    .expect_err("bad retries");

    assert!(err.to_string().contains("MONITOR_MAX_RETRIES"));
}
