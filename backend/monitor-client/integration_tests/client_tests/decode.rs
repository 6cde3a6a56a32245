use crate::client_tests::helpers::{client_with_retries, success_envelope};

use monitor_client::{
    ApiError, CallContext, ClientError, ListOptions, PaginatedResponse, PaginationMeta, Request,
    StandardResponse,
};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Probe {
    id: u64,
    name: String,
    regions: Vec<String>,
    interval_seconds: u32,
}

fn probe() -> Probe {
    Probe {
        id: 42,
        name: "edge-1".to_string(),
        regions: vec!["eu-west".to_string(), "us-east".to_string()],
        interval_seconds: 60,
    }
}

/// **VALUE**: Verifies a typed payload survives the trip through the envelope unchanged.
#[tokio::test]
async fn given_typed_payload_when_server_echoes_it_then_decoded_value_is_equal() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/probes/42"))
        .respond_with(|req: &wiremock::Request| -> ResponseTemplate {
            let sent: Value = serde_json::from_slice(&req.body).expect("json body");
            ResponseTemplate::new(200).set_body_json(success_envelope(sent))
        })
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(0));

    // WHEN
    let decoded = client
        .execute::<StandardResponse<Probe>>(
            &CallContext::new(),
            Request::put("/v1/probes/42").json(&probe()),
        )
        .await
        .expect("decodes");

    // THEN
    assert_eq!(decoded.envelope.data, Some(probe()));
    assert_eq!(decoded.envelope.status, "success");
    assert_eq!(decoded.pagination, None);
}

/// **VALUE**: Verifies the caller's destination decides the shape.
///
/// **BUG THIS CATCHES**: Would catch a single-object body being coerced into a list.
#[tokio::test]
async fn given_single_object_body_when_sequence_expected_then_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!(probe()))))
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(0));

    let err = client
        .execute::<StandardResponse<Vec<Probe>>>(&CallContext::new(), Request::get("/v1/probes/42"))
        .await
        .expect_err("shape mismatch");

    assert!(matches!(err, ClientError::Decode { .. }));
}

/// **VALUE**: Verifies list calls send their options and hand back the `meta` block.
#[tokio::test]
async fn given_list_call_when_executed_then_pagination_meta_is_returned() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/probes"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "",
            "data": [probe()],
            "meta": {"page": 2, "limit": 1, "total_items": 3, "total_pages": 3, "has_more": true}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(0));
    let options = ListOptions::builder()
        .with_page(2)
        .with_limit(1)
        .build()
        .expect("options");

    // WHEN
    let mut page = PaginatedResponse::<Probe> {
        status: String::new(),
        message: String::new(),
        data: Vec::new(),
        meta: PaginationMeta::default(),
    };
    let meta = client
        .execute_into(
            &CallContext::new(),
            Request::get("/v1/probes").list_options(&options),
            &mut page,
        )
        .await
        .expect("decodes");

    // THEN
    let meta = meta.expect("list envelopes carry meta");
    assert_eq!(meta.page, 2);
    assert_eq!(meta.total_items, 3);
    assert_eq!(meta.has_more, Some(true));
    assert_eq!(page.data, vec![probe()]);
}

/// **VALUE**: Verifies `execute_into` leaves the caller's destination alone on failure.
///
/// **WHY THIS MATTERS**: Callers page through lists by reusing one destination; a failed
/// page must not wipe out the last good one.
///
/// **BUG THIS CATCHES**: Would catch the destination being reset or half-written before a
/// decode error or an API error is returned.
#[tokio::test]
async fn given_failing_calls_when_executed_into_destination_then_destination_is_untouched() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/probes/shape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!(probe()))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/probes/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"status": "error", "message": "gone"})),
        )
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(0));
    let last_good = PaginatedResponse::<Probe> {
        status: "success".to_string(),
        message: String::new(),
        data: vec![probe()],
        meta: PaginationMeta::default(),
    };
    let mut page = last_good.clone();

    // WHEN
    let shape_err = client
        .execute_into(&CallContext::new(), Request::get("/v1/probes/shape"), &mut page)
        .await
        .expect_err("single object is not a page");
    let missing_err = client
        .execute_into(&CallContext::new(), Request::get("/v1/probes/missing"), &mut page)
        .await
        .expect_err("404");

    // THEN
    assert!(matches!(shape_err, ClientError::Decode { .. }));
    assert!(missing_err.is_not_found());
    assert_eq!(page, last_good);
}

#[tokio::test]
async fn given_empty_success_body_when_decoded_then_envelope_has_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(0));

    let decoded = client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::delete("/v1/probes/42"))
        .await
        .expect("empty body is an empty envelope");

    assert_eq!(decoded.status.as_u16(), 204);
    assert_eq!(decoded.envelope.data, None);
}

/// **VALUE**: Verifies an HTML error page is surfaced as a generic API error.
///
/// **WHY THIS MATTERS**: A 400 from a proxy says nothing about the request's fields;
/// reporting it as a validation failure would send callers hunting for a bad input.
///
/// **BUG THIS CATCHES**: Would catch the status mapping being applied to a body that is
/// not the structured error shape.
#[tokio::test]
async fn given_html_error_page_when_executing_then_generic_error_carries_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("<h1>Bad input</h1>"))
        .mount(&server)
        .await;
    let client = client_with_retries(&server, Some(0));

    let err = client
        .execute::<StandardResponse<Value>>(&CallContext::new(), Request::get("/v1/probes"))
        .await
        .expect_err("400");

    let api_error = err.api_error().expect("classified");
    assert!(matches!(api_error, ApiError::Generic { .. }));
    assert_eq!(api_error.status().as_u16(), 400);
    assert_eq!(api_error.message(), "<h1>Bad input</h1>");
    assert_eq!(api_error.code(), None);
}
