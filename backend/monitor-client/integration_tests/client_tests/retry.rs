use crate::client_tests::helpers::{client_with_retries, received_count, success_envelope};

use monitor_client::{ApiError, CallContext, ClientError, Request, StandardResponse};

use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount a responder that fails `failures` times with `status`, then succeeds.
async fn mount_flaky(server: &MockServer, failures: usize, status: u16) {
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_clone = attempts.clone();
    Mock::given(method("GET"))
        .and(path("/v1/probes/42"))
        .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
            let current = attempts_clone.fetch_add(1, Ordering::SeqCst);
            if current < failures {
                ResponseTemplate::new(status)
            } else {
                ResponseTemplate::new(200).set_body_json(success_envelope(json!({"id": 42})))
            }
        })
        .mount(server)
        .await;
}

/// **VALUE**: Verifies N transient failures followed by success take exactly N+1 attempts.
///
/// **WHY THIS MATTERS**: Every resource call rides on this loop; a blip on the platform's
/// load balancer must not surface to callers while the budget lasts.
///
/// **BUG THIS CATCHES**: Would catch off-by-one budgets or a loop that stops retrying after
/// the first 5xx.
#[tokio::test]
async fn given_two_server_errors_when_executing_then_succeeds_on_third_attempt() {
    // GIVEN
    let server = MockServer::start().await;
    mount_flaky(&server, 2, 500).await;
    let client = client_with_retries(&server, Some(3));

    // WHEN
    let decoded = client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/probes/42"))
        .await
        .expect("call should succeed after retries");

    // THEN
    assert_eq!(decoded.attempts, 3);
    assert_eq!(decoded.envelope.data, Some(json!({"id": 42})));
    assert_eq!(received_count(&server).await, 3);
}

#[tokio::test]
async fn given_budget_of_three_when_three_503s_then_succeeds_on_fourth_attempt() {
    let server = MockServer::start().await;
    mount_flaky(&server, 3, 503).await;
    let client = client_with_retries(&server, Some(3));

    let decoded = client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/probes/42"))
        .await
        .expect("fourth attempt succeeds");

    assert_eq!(decoded.attempts, 4);
    assert_eq!(received_count(&server).await, 4);
}

/// **VALUE**: Verifies the default budget (no explicit retries) allows four attempts.
#[tokio::test]
async fn given_default_budget_when_three_503s_then_succeeds_on_fourth_attempt() {
    let server = MockServer::start().await;
    mount_flaky(&server, 3, 503).await;
    let client = client_with_retries(&server, None);

    let decoded = client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/probes/42"))
        .await
        .expect("fourth attempt succeeds");

    assert_eq!(decoded.attempts, 4);
    assert_eq!(received_count(&server).await, 4);
}

/// **VALUE**: Verifies the loop gives up after exactly N+1 attempts and surfaces the
/// last response through the classifier.
///
/// **BUG THIS CATCHES**: Would catch an unbounded retry loop or a lost status code.
#[tokio::test]
async fn given_persistent_503_when_budget_exhausted_then_last_error_is_returned() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(2));

    // WHEN
    let err = client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/status"))
        .await
        .expect_err("should fail once the budget is spent");

    // THEN
    match err.api_error() {
        Some(ApiError::Generic { status, message, .. }) => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("expected generic 503, got {other:?}"),
    }
    assert_eq!(received_count(&server).await, 3);
}

#[tokio::test]
async fn given_zero_retries_when_server_fails_then_single_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(0));

    let result = client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/status"))
        .await;

    assert!(result.is_err());
    assert_eq!(received_count(&server).await, 1);
}

/// **VALUE**: Verifies 4xx responses are terminal and 404 gets the fixed message.
///
/// **BUG THIS CATCHES**: Would catch a 404 being retried, or the server's own wording
/// leaking into the not-found message callers match on.
#[tokio::test]
async fn given_404_when_executing_then_no_retry_and_not_found_error() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/probes"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "error",
            "message": "no such route",
            "error": "NOT_FOUND"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(3));

    // WHEN
    let err = client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/probes"))
        .await
        .expect_err("404 is an error");

    // THEN
    assert!(err.is_not_found());
    assert_eq!(err.api_error().map(ApiError::message), Some("resource not found"));
    assert_eq!(received_count(&server).await, 1);
}

#[tokio::test]
async fn given_rate_limit_when_executing_then_not_retried_and_hint_exposed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "12")
                .set_body_json(json!({"message": "too many requests"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(3));

    let err = client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/probes"))
        .await
        .expect_err("429 is an error");

    let api_error = err.api_error().expect("classified");
    assert!(matches!(api_error, ApiError::RateLimit { .. }));
    assert_eq!(api_error.retry_after(), Some(std::time::Duration::from_secs(12)));
}

/// **VALUE**: Verifies writes are retried too, with the same body on every attempt.
///
/// **WHY THIS MATTERS**: POST retries are at-least-once; a replay must at least be the
/// identical request, not a half-built one.
#[tokio::test]
async fn given_post_when_first_attempt_fails_then_body_is_replayed_identically() {
    let server = MockServer::start().await;
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_clone = attempts.clone();
    Mock::given(method("POST"))
        .and(path("/v1/probes"))
        .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
            if attempts_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(502)
            } else {
                ResponseTemplate::new(201).set_body_json(success_envelope(json!({"id": 7})))
            }
        })
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(1));

    let decoded = client
        .execute::<StandardResponse<Value>>(
            &CallContext::new(),
            Request::post("/v1/probes").json(&json!({"name": "edge-1"})),
        )
        .await
        .expect("second attempt succeeds");

    assert_eq!(decoded.status.as_u16(), 201);
    let requests = server.received_requests().await.expect("recorded");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
    assert_eq!(requests[0].body, br#"{"name":"edge-1"}"#.to_vec());
}

/// **VALUE**: Verifies connection-level failures are retried and then surfaced as a
/// transport error that reports the attempt count.
#[tokio::test]
async fn given_refused_connection_when_executing_then_transport_error_after_all_attempts() {
    // GIVEN: a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = monitor_client::Client::new(
        monitor_client::ClientConfig::new(format!("http://{addr}"))
            .with_max_retries(2)
            .with_retry_delays(
                std::time::Duration::from_millis(5),
                std::time::Duration::from_millis(10),
            ),
    )
    .expect("client");

    // WHEN
    let err = client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/status"))
        .await
        .expect_err("nothing is listening");

    // THEN
    match err {
        ClientError::Transport { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("expected transport error, got {other:?}"),
    }
}
