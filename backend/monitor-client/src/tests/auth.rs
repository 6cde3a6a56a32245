use crate::auth::resolver::{redacted_listing, resolve};
use crate::auth::{AuthConfig, ENV_API_KEY, ENV_SERVER_UUID, ENV_TOKEN};
use crate::error::ConfigError;

use std::collections::HashMap;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

/// **VALUE**: Verifies a bearer token becomes exactly one `Authorization` header.
///
/// **BUG THIS CATCHES**: Would catch a missing `Bearer ` prefix or a second scheme's
/// headers leaking into the same request.
#[test]
fn given_token_scheme_when_resolved_then_only_bearer_header_is_set() {
    // GIVEN
    let auth = AuthConfig::token("tok-123");

    // WHEN
    let headers = resolve(&auth, &HeaderMap::new()).expect("resolve");

    // THEN
    assert_eq!(headers.len(), 1);
    assert_eq!(headers[AUTHORIZATION], "Bearer tok-123");
    assert!(headers[AUTHORIZATION].is_sensitive());
}

#[test]
fn given_api_key_scheme_when_resolved_then_key_and_secret_headers_are_set() {
    let auth = AuthConfig::api_key("key-1", "secret-1");

    let headers = resolve(&auth, &HeaderMap::new()).expect("resolve");

    assert_eq!(headers.len(), 2);
    assert_eq!(headers["access-key"], "key-1");
    assert_eq!(headers["access-secret"], "secret-1");
    assert!(!headers.contains_key(AUTHORIZATION));
}

#[test]
fn given_server_identity_when_resolved_then_server_headers_are_set() {
    let auth = AuthConfig::server_identity("2f1c", "agent-secret");

    let headers = resolve(&auth, &HeaderMap::new()).expect("resolve");

    assert_eq!(headers.len(), 2);
    assert_eq!(headers["x-server-uuid"], "2f1c");
    assert_eq!(headers["x-server-secret"], "agent-secret");
}

#[test]
fn given_registration_key_when_resolved_then_only_registration_header_is_set() {
    let auth = AuthConfig::registration_key("reg-1");

    let headers = resolve(&auth, &HeaderMap::new()).expect("resolve");

    assert_eq!(headers.len(), 1);
    assert_eq!(headers["x-registration-key"], "reg-1");
}

#[test]
fn given_no_credentials_when_resolved_then_no_headers_are_set() {
    let headers = resolve(&AuthConfig::None, &HeaderMap::new()).expect("resolve");
    assert!(headers.is_empty());
}

/// **VALUE**: Verifies an explicit credential header replaces the configured scheme entirely.
///
/// **WHY THIS MATTERS**: Server self-registration sends a registration key from a client
/// that is otherwise configured with a bearer token. Sending both would authenticate the
/// call as the wrong principal.
///
/// **BUG THIS CATCHES**: Would catch the configured `Authorization` header surviving next
/// to an `X-Registration-Key` override.
#[test]
fn given_token_client_when_registration_key_override_then_token_is_suppressed() {
    // GIVEN
    let auth = AuthConfig::token("tok-123");
    let mut overrides = HeaderMap::new();
    overrides.insert(
        HeaderName::from_static("x-registration-key"),
        HeaderValue::from_static("reg-9"),
    );

    // WHEN
    let headers = resolve(&auth, &overrides).expect("resolve");

    // THEN
    assert_eq!(headers.len(), 1);
    assert_eq!(headers["x-registration-key"], "reg-9");
    assert!(!headers.contains_key(AUTHORIZATION));
}

#[test]
fn given_non_credential_override_when_resolved_then_scheme_is_kept() {
    let auth = AuthConfig::token("tok-123");
    let mut overrides = HeaderMap::new();
    overrides.insert(
        HeaderName::from_static("x-trace"),
        HeaderValue::from_static("abc"),
    );

    let headers = resolve(&auth, &overrides).expect("resolve");

    assert_eq!(headers.len(), 2);
    assert_eq!(headers[AUTHORIZATION], "Bearer tok-123");
    assert_eq!(headers["x-trace"], "abc");
}

#[test]
fn given_credential_headers_when_listed_then_values_are_masked() {
    let auth = AuthConfig::api_key("key-1", "very-secret");
    let headers = resolve(&auth, &HeaderMap::new()).expect("resolve");

    let listing = redacted_listing(&headers);

    assert_eq!(listing, "access-key: [REDACTED], access-secret: [REDACTED]");
    assert!(!listing.contains("very-secret"));
}

/// **VALUE**: Verifies the environment precedence between credential schemes.
///
/// **BUG THIS CATCHES**: Would catch a lower scheme (token) winning over server identity
/// when an agent host has both configured.
#[test]
fn given_several_schemes_in_env_when_loaded_then_highest_precedence_wins() {
    let lookup = lookup_from(&[
        (ENV_TOKEN, "tok"),
        (ENV_API_KEY, "k"),
        ("MONITOR_API_SECRET", "s"),
        (ENV_SERVER_UUID, "uuid-1"),
        ("MONITOR_SERVER_SECRET", "srv"),
    ]);

    let auth = AuthConfig::from_lookup(lookup).expect("auth");

    assert_eq!(auth, AuthConfig::server_identity("uuid-1", "srv"));
}

#[test]
fn given_token_and_registration_key_when_loaded_then_token_wins() {
    let lookup = lookup_from(&[(ENV_TOKEN, "tok"), ("MONITOR_REGISTRATION_KEY", "reg")]);

    let auth = AuthConfig::from_lookup(lookup).expect("auth");

    assert_eq!(auth.scheme_name(), "token");
}

#[test]
fn given_half_of_api_key_pair_when_loaded_then_env_error_names_missing_variable() {
    let lookup = lookup_from(&[(ENV_API_KEY, "k"), (ENV_TOKEN, "tok")]);

    let err = AuthConfig::from_lookup(lookup).expect_err("half pair should fail");

    match err {
        ConfigError::EnvError { variable, .. } => assert_eq!(variable, "MONITOR_API_SECRET"),
        other => panic!("expected EnvError, got {other:?}"),
    }
}

#[test]
fn given_blank_secret_when_validated_then_error_does_not_leak_other_parts() {
    let auth = AuthConfig::api_key("visible-key", "   ");

    let err = auth.validate().expect_err("blank secret");

    let message = err.to_string();
    assert!(message.contains("API secret cannot be empty"));
    assert!(!message.contains("visible-key"));
}

#[test]
fn given_auth_config_when_debug_formatted_then_secrets_are_redacted() {
    let auth = AuthConfig::token("tok-should-not-print");

    let debug = format!("{auth:?}");

    assert!(!debug.contains("tok-should-not-print"));
}
