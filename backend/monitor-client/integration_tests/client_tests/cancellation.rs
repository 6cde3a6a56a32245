use crate::client_tests::helpers::{client_with_retries, fast_config, received_count, success_envelope};

use monitor_client::{CallContext, Client, ClientError, Request, StandardResponse};

use std::time::Duration;

use serde_json::{Value, json};
use tokio::time::{Instant, sleep};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies an already-cancelled context makes zero network attempts.
///
/// **BUG THIS CATCHES**: Would catch the context only being consulted after the first
/// dispatch.
#[tokio::test]
async fn given_cancelled_context_when_executing_then_no_request_is_sent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({}))))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(3));
    let ctx = CallContext::new();
    ctx.cancel();

    // WHEN
    let err = client
        .execute::<StandardResponse<Value>>(&ctx, Request::get("/v1/probes"))
        .await
        .expect_err("cancelled");

    // THEN
    assert!(matches!(err, ClientError::Cancelled { .. }));
    assert_eq!(received_count(&server).await, 0);
}

/// **VALUE**: Verifies cancelling while a response is outstanding returns promptly.
///
/// **WHY THIS MATTERS**: A CLI interrupted with Ctrl-C, or a service shutting down, must
/// not hang until the server eventually answers.
///
/// **BUG THIS CATCHES**: Would catch the network wait not being raced against cancellation.
#[tokio::test]
async fn given_slow_response_when_cancelled_mid_flight_then_returns_before_response() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_envelope(json!({})))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(0));
    let ctx = CallContext::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    // WHEN
    let started = Instant::now();
    let result = client
        .execute::<StandardResponse<Value>>(&ctx, Request::get("/v1/probes"))
        .await;

    // THEN
    assert!(matches!(result, Err(ClientError::Cancelled { .. })));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn given_deadline_shorter_than_response_when_executing_then_deadline_exceeded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_envelope(json!({})))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(3));
    let ctx = CallContext::new().with_timeout(Duration::from_millis(150));

    let started = Instant::now();
    let err = client
        .execute::<StandardResponse<Value>>(&ctx, Request::get("/v1/probes"))
        .await
        .expect_err("deadline");

    assert!(matches!(err, ClientError::DeadlineExceeded { .. }));
    assert!(err.is_cancellation());
    assert!(started.elapsed() < Duration::from_secs(5));
}

/// **VALUE**: Verifies cancellation also interrupts the backoff sleep between attempts.
///
/// **BUG THIS CATCHES**: Would catch a plain `sleep` in the retry loop that ignores the
/// context and only notices cancellation at the next dispatch.
#[tokio::test]
async fn given_long_backoff_when_cancelled_during_wait_then_no_further_attempts() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let client = Client::new(
        fast_config(&server)
            .with_max_retries(3)
            .with_retry_delays(Duration::from_secs(10), Duration::from_secs(10)),
    )
    .expect("client");
    let ctx = CallContext::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    // WHEN
    let started = Instant::now();
    let result = client
        .execute::<StandardResponse<Value>>(&ctx, Request::get("/v1/probes"))
        .await;

    // THEN
    assert!(matches!(result, Err(ClientError::Cancelled { .. })));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(received_count(&server).await, 1);
}

#[tokio::test]
async fn given_shared_context_when_cancelled_then_every_call_under_it_ends() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(0));
    let ctx = CallContext::new();

    let first = {
        let (client, ctx) = (client.clone(), ctx.child());
        tokio::spawn(async move {
            client
                .execute::<StandardResponse<Value>>(&ctx, Request::get("/v1/probes"))
                .await
        })
    };
    let second = {
        let (client, ctx) = (client.clone(), ctx.child());
        tokio::spawn(async move {
            client
                .execute::<StandardResponse<Value>>(&ctx, Request::get("/v1/alerts"))
                .await
        })
    };
    sleep(Duration::from_millis(100)).await;
    ctx.cancel();

    for handle in [first, second] {
        let result = handle.await.expect("task completes");
        assert!(matches!(result, Err(ClientError::Cancelled { .. })));
    }
}
