use crate::commands::request::{RequestArgs, build_request, parse_header, parse_query_pair};
use crate::error::CliError;

use monitor_client::ClientError;

fn args(method: &str, path: &str) -> RequestArgs {
    RequestArgs {
        method: method.to_string(),
        path: path.to_string(),
        query: Vec::new(),
        headers: Vec::new(),
        data: None,
        paginated: false,
    }
}

#[test]
fn given_query_pair_with_equals_in_value_when_parsed_then_split_on_first() {
    let (key, value) = parse_query_pair("filter=a=b").expect("valid pair");

    assert_eq!(key, "filter");
    assert_eq!(value, "a=b");
}

#[test]
fn given_malformed_query_pair_when_parsed_then_argument_error() {
    for raw in ["novalue", "=x", ""] {
        assert!(
            matches!(parse_query_pair(raw), Err(CliError::Argument { .. })),
            "{raw:?} should be rejected"
        );
    }
}

#[test]
fn given_header_with_spaces_when_parsed_then_name_and_value_are_trimmed() {
    let (name, value) = parse_header("  X-Registration-Key :  reg-1 ").expect("valid header");

    assert_eq!(name, "X-Registration-Key");
    assert_eq!(value, "reg-1");
}

/// **VALUE**: Verifies a malformed header never echoes its text back.
///
/// **BUG THIS CATCHES**: Would catch a token pasted without its header name ending up in
/// the terminal or the log file.
#[test]
fn given_malformed_header_when_parsed_then_error_does_not_echo_it() {
    let err = parse_header("Bearer sk-live-123").expect_err("no colon");

    assert!(!err.to_string().contains("sk-live-123"));
}

#[test]
fn given_full_args_when_building_request_then_query_and_body_are_set() {
    let mut args = args("post", "/v1/probes");
    args.query = vec!["organization=acme".to_string()];
    args.headers = vec!["X-Trace: abc".to_string()];
    args.data = Some(r#"{"name": "edge-1"}"#.to_string());

    let request = build_request(&args).expect("builds");

    assert_eq!(request.method().as_str(), "POST");
    assert_eq!(request.path(), "/v1/probes");
    assert_eq!(
        request.query_params().get("organization").map(String::as_str),
        Some("acme")
    );
}

#[test]
fn given_invalid_json_data_when_building_request_then_argument_error() {
    let mut args = args("POST", "/v1/probes");
    args.data = Some("{name:".to_string());

    assert!(matches!(build_request(&args), Err(CliError::Argument { .. })));
}

#[test]
fn given_unsupported_method_when_building_request_then_invalid_request() {
    let result = build_request(&args("OPTIONS", "/v1/probes"));

    assert!(matches!(
        result,
        Err(CliError::Client(ClientError::InvalidRequest { .. }))
    ));
}
