use crate::client_tests::helpers::{
    TEST_TOKEN, client_with_retries, fast_config, received_count, success_envelope,
};

use monitor_client::{
    AuthConfig, CallContext, Client, ClientError, Request, StandardResponse, USER_AGENT,
};

use serde_json::{Value, json};
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CREDENTIAL_HEADERS: [&str; 6] = [
    "authorization",
    "access-key",
    "access-secret",
    "x-server-uuid",
    "x-server-secret",
    "x-registration-key",
];

async fn mount_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({}))))
        .mount(server)
        .await;
}

async fn credential_headers_of_last_request(server: &MockServer) -> Vec<(String, String)> {
    let requests = server.received_requests().await.expect("recorded");
    let last = requests.last().expect("at least one request");
    CREDENTIAL_HEADERS
        .iter()
        .filter_map(|name| {
            last.headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect()
}

/// **VALUE**: Verifies exactly one scheme's headers go out on the wire.
#[tokio::test]
async fn given_api_key_client_when_executing_then_only_key_headers_are_sent() {
    // GIVEN
    let server = MockServer::start().await;
    mount_ok(&server).await;
    let client = Client::new(fast_config(&server).with_auth(AuthConfig::api_key("k-1", "s-1")))
        .expect("client");

    // WHEN
    client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/probes"))
        .await
        .expect("ok");

    // THEN
    assert_eq!(
        credential_headers_of_last_request(&server).await,
        vec![
            ("access-key".to_string(), "k-1".to_string()),
            ("access-secret".to_string(), "s-1".to_string()),
        ]
    );
}

/// **VALUE**: Verifies the registration flow: a token-configured client sending an
/// explicit registration key sends that key and nothing else.
///
/// **BUG THIS CATCHES**: Would catch `Authorization` being sent alongside the override.
#[tokio::test]
async fn given_token_client_when_registration_key_override_then_token_is_not_sent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-registration-key", "reg-key-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(success_envelope(json!({}))))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(0));

    // WHEN
    client
        .execute::<StandardResponse<Value>>(
            &CallContext::new(),
            Request::post("/v1/servers/register")
                .header("X-Registration-Key", "reg-key-1")
                .json(&json!({"hostname": "edge-1"})),
        )
        .await
        .expect("registration succeeds");

    // THEN
    assert_eq!(
        credential_headers_of_last_request(&server).await,
        vec![("x-registration-key".to_string(), "reg-key-1".to_string())]
    );
}

/// **VALUE**: Verifies deriving a client with new credentials leaves the original as it was.
///
/// **WHY THIS MATTERS**: Long-lived services keep one base client and derive per-tenant
/// ones; a derived client mutating shared state would send one tenant's token for another.
#[tokio::test]
async fn given_derived_client_when_both_execute_then_each_uses_its_own_token() {
    // GIVEN
    let server = MockServer::start().await;
    mount_ok(&server).await;
    let original = client_with_retries(&server, Some(0));
    let derived = original.with_token("other-token");

    // WHEN
    derived
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/probes"))
        .await
        .expect("derived ok");
    let after_derived = credential_headers_of_last_request(&server).await;
    original
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/probes"))
        .await
        .expect("original ok");
    let after_original = credential_headers_of_last_request(&server).await;

    // THEN
    assert_eq!(
        after_derived,
        vec![("authorization".to_string(), "Bearer other-token".to_string())]
    );
    assert_eq!(
        after_original,
        vec![("authorization".to_string(), format!("Bearer {TEST_TOKEN}"))]
    );
    assert_eq!(original.auth(), &AuthConfig::token(TEST_TOKEN));
}

#[tokio::test]
async fn given_any_request_when_sent_then_user_agent_and_request_id_are_set() {
    let server = MockServer::start().await;
    mount_ok(&server).await;
    let client = client_with_retries(&server, Some(0));

    client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/probes"))
        .await
        .expect("ok");

    let requests = server.received_requests().await.expect("recorded");
    let sent = &requests[0];
    assert_eq!(
        sent.headers.get("user-agent").and_then(|v| v.to_str().ok()),
        Some(USER_AGENT)
    );
    let request_id = sent
        .headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("request id header");
    assert_eq!(request_id.len(), 36);
}

#[tokio::test]
async fn given_unauthenticated_client_when_executing_then_no_credential_headers() {
    let server = MockServer::start().await;
    mount_ok(&server).await;
    let client = Client::new(fast_config(&server)).expect("client");

    client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/status"))
        .await
        .expect("ok");

    assert!(credential_headers_of_last_request(&server).await.is_empty());
}

/// **VALUE**: Verifies a derived client with a blank token fails before touching the network.
///
/// **WHY THIS MATTERS**: `Client::new` already rejects blank credentials; a derived client
/// must not be a way around that check.
///
/// **BUG THIS CATCHES**: Would catch a request going out with a bare `Authorization: Bearer`
/// header after `with_token("")`.
#[tokio::test]
async fn given_derived_client_with_blank_token_when_executing_then_config_error_and_no_request() {
    // GIVEN
    let server = MockServer::start().await;
    mount_ok(&server).await;
    let derived = client_with_retries(&server, Some(3)).with_token("");

    // WHEN
    let err = derived
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/probes"))
        .await
        .expect_err("blank token is rejected pre-flight");

    // THEN
    assert!(matches!(err, ClientError::Config(_)));
    assert_eq!(received_count(&server).await, 0);
}

#[tokio::test]
async fn given_derived_api_key_with_blank_secret_when_executing_then_no_request() {
    let server = MockServer::start().await;
    mount_ok(&server).await;
    let derived = client_with_retries(&server, Some(0)).with_api_key("k-1", "  ");

    let result = derived
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/probes"))
        .await;

    assert!(matches!(result, Err(ClientError::Config(_))));
    assert_eq!(received_count(&server).await, 0);
}
