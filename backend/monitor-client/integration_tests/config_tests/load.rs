use monitor_client::{AuthConfig, ClientConfig, ConfigError};

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write config");
    file
}

/// **VALUE**: Verifies a config file on disk loads with its auth table and durations.
#[test]
fn given_config_file_when_loaded_then_values_are_applied() {
    // GIVEN
    let file = write_config(
        r#"
base_url = "https://api.example.com/monitor"
max_retries = 5
timeout = "15s"

[auth]
scheme = "server_identity"
server_uuid = "7b0a"
server_secret = "agent-secret"
"#,
    );

    // WHEN
    let config = ClientConfig::load(file.path()).expect("loads");

    // THEN
    assert_eq!(config.max_attempts(), 6);
    assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    assert_eq!(
        config.auth,
        AuthConfig::server_identity("7b0a", "agent-secret")
    );
}

#[test]
fn given_missing_file_when_loaded_then_read_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let err = ClientConfig::load(&path).expect_err("missing");

    assert!(matches!(err, ConfigError::ReadError { .. }));
}

/// **VALUE**: Verifies parse errors name the offending file.
#[test]
fn given_malformed_file_when_loaded_then_parse_error_carries_path() {
    let file = write_config("base_url = ");

    let err = ClientConfig::load(file.path()).expect_err("malformed");

    match err {
        ConfigError::ParseError { path, .. } => assert_eq!(path, file.path()),
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[test]
fn given_blank_token_in_file_when_loaded_then_validation_error() {
    let file = write_config(
        r#"
base_url = "https://api.example.com"

[auth]
scheme = "token"
token = ""
"#,
    );

    let err = ClientConfig::load(file.path()).expect_err("blank token");

    assert!(matches!(err, ConfigError::ValidationError { .. }));
}
