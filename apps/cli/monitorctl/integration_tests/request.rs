use monitorctl::commands::request::{RequestArgs, run};
use monitorctl::error::CliError;

use monitor_client::{AuthConfig, CallContext, Client, ClientConfig};

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::new(
        ClientConfig::new(server.uri())
            .with_auth(AuthConfig::token("cli-token"))
            .with_max_retries(1)
            .with_retry_delays(Duration::from_millis(5), Duration::from_millis(10)),
    )
    .expect("Failed to build client")
}

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

/// **VALUE**: Verifies the command sends query, body and credentials and prints the
/// decoded envelope.
#[tokio::test]
async fn given_post_with_query_and_body_when_run_then_envelope_is_printed() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/probes"))
        .and(query_param("organization", "acme"))
        .and(header("authorization", "Bearer cli-token"))
        .and(body_json(json!({"name": "edge-1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "message": "created",
            "data": {"id": 9, "name": "edge-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let mut args = args("POST", "/v1/probes");
    args.query = vec!["organization=acme".to_string()];
    args.data = Some(r#"{"name":"edge-1"}"#.to_string());

    // WHEN
    let output = run(&client_for(&server), &CallContext::new(), &args)
        .await
        .expect("command succeeds");

    // THEN
    let printed: Value = serde_json::from_str(&output).expect("output is JSON");
    assert_eq!(printed["message"], "created");
    assert_eq!(printed["data"]["id"], 9);
}

#[tokio::test]
async fn given_paginated_flag_when_run_then_meta_is_printed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "",
            "data": [{"id": 1}],
            "meta": {"page": 1, "limit": 50, "total_items": 1, "total_pages": 1}
        })))
        .mount(&server)
        .await;
    let mut args = args("GET", "/v1/alerts");
    args.paginated = true;

    let output = run(&client_for(&server), &CallContext::new(), &args)
        .await
        .expect("command succeeds");

    let printed: Value = serde_json::from_str(&output).expect("output is JSON");
    assert_eq!(printed["meta"]["total_items"], 1);
    assert_eq!(printed["data"].as_array().map(Vec::len), Some(1));
}

/// **VALUE**: Verifies a registration key passed with `-H` replaces the configured token.
#[tokio::test]
async fn given_registration_header_when_run_then_configured_token_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&server)
        .await;
    let mut args = args("POST", "/v1/servers/register");
    args.headers = vec!["X-Registration-Key: reg-1".to_string()];

    run(&client_for(&server), &CallContext::new(), &args)
        .await
        .expect("command succeeds");

    let requests = server.received_requests().await.expect("recorded");
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        requests[0]
            .headers
            .get("x-registration-key")
            .and_then(|v| v.to_str().ok()),
        Some("reg-1")
    );
}

#[tokio::test]
async fn given_not_found_when_run_then_client_error_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"status": "error", "message": "unknown probe"})),
        )
        .mount(&server)
        .await;

    let err = run(
        &client_for(&server),
        &CallContext::new(),
        &args("GET", "/v1/probes/404"),
    )
    .await
    .expect_err("404");

    match err {
        CliError::Client(client_error) => assert!(client_error.is_not_found()),
        other => panic!("expected client error, got {other:?}"),
    }
}

#[tokio::test]
async fn given_cancelled_context_when_run_then_exit_code_is_130() {
    let server = MockServer::start().await;
    let ctx = CallContext::new();
    ctx.cancel();

    let err = run(&client_for(&server), &ctx, &args("GET", "/v1/probes"))
        .await
        .expect_err("cancelled");

    assert_eq!(err.exit_code(), 130);
}
