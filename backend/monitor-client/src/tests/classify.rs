use crate::classify::{NOT_FOUND_MESSAGE, classify, parse_retry_after};
use crate::error::ApiError;

use common::HttpStatusCode;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

/// **VALUE**: Verifies a structured body supplies message, code and details.
///
/// **BUG THIS CATCHES**: Would catch the `error` field being read as the message, or
/// `details` being dropped on the floor.
#[test]
fn given_structured_validation_body_when_classified_then_fields_are_carried() {
    // GIVEN
    let body = br#"{"status":"error","message":"name is required","error":"VALIDATION","details":"field: name"}"#;

    // WHEN
    let error = classify(HttpStatusCode::UNPROCESSABLE_ENTITY, body, None);

    // THEN
    assert!(matches!(error, ApiError::Validation { .. }));
    assert_eq!(error.message(), "name is required");
    assert_eq!(error.code(), Some("VALIDATION"));
    assert_eq!(error.details(), Some("field: name"));
    assert_eq!(error.status().as_u16(), 422);
}

/// **VALUE**: Verifies 404 always carries the fixed not-found message.
///
/// **WHY THIS MATTERS**: Callers branch on "not found" to implement get-or-create flows;
/// the server's wording varies per endpoint.
#[test]
fn given_404_with_server_message_when_classified_then_message_is_normalized() {
    let body = br#"{"status":"error","message":"Probe 42 does not exist","error":"NOT_FOUND"}"#;

    let error = classify(HttpStatusCode::NOT_FOUND, body, None);

    assert!(error.is_not_found());
    assert_eq!(error.message(), NOT_FOUND_MESSAGE);
    assert_eq!(error.code(), Some("NOT_FOUND"));
}

#[test]
fn given_html_body_when_classified_then_raw_text_is_the_message() {
    let body = b"<html><body>Bad Gateway</body></html>";

    let error = classify(HttpStatusCode(502), body, None);

    assert!(matches!(error, ApiError::Generic { .. }));
    assert_eq!(error.message(), "<html><body>Bad Gateway</body></html>");
    assert_eq!(error.code(), None);
    assert_eq!(error.details(), None);
}

#[test]
fn given_empty_body_when_classified_then_reason_phrase_is_the_message() {
    let error = classify(HttpStatusCode::SERVICE_UNAVAILABLE, b"", None);

    assert!(matches!(error, ApiError::Generic { .. }));
    assert_eq!(error.message(), "Service Unavailable");
}

#[test]
fn given_each_mapped_status_when_classified_then_variant_matches() {
    let cases: [(u16, fn(&ApiError) -> bool); 6] = [
        (400, |e| matches!(e, ApiError::Validation { .. })),
        (401, |e| matches!(e, ApiError::Unauthorized { .. })),
        (403, |e| matches!(e, ApiError::Forbidden { .. })),
        (404, |e| matches!(e, ApiError::NotFound { .. })),
        (429, |e| matches!(e, ApiError::RateLimit { .. })),
        (409, |e| matches!(e, ApiError::Generic { .. })),
    ];

    for (code, is_expected) in cases {
        let error = classify(HttpStatusCode(code), br#"{"status":"error"}"#, None);
        assert!(is_expected(&error), "{code} classified as {error:?}");
        assert!(!error.message().is_empty(), "{code} has an empty message");
    }
}

/// **VALUE**: Verifies an unparseable body falls back to the generic error even when the
/// status has a dedicated variant.
///
/// **WHY THIS MATTERS**: Proxies and load balancers answer 401/403/429 with HTML pages;
/// only the API itself speaks the structured error shape.
///
/// **BUG THIS CATCHES**: Would catch a 401 HTML page from a gateway being reported as an
/// `Unauthorized` API error with the page markup as its message.
#[test]
fn given_mapped_status_with_unparseable_body_when_classified_then_error_is_generic() {
    for code in [400u16, 401, 403, 404, 422, 429] {
        // GIVEN
        let body = b"<html>nope</html>";

        // WHEN
        let error = classify(HttpStatusCode(code), body, Some(Duration::from_secs(5)));

        // THEN
        assert!(
            matches!(error, ApiError::Generic { .. }),
            "{code} classified as {error:?}"
        );
        assert_eq!(error.status().as_u16(), code);
        assert_eq!(error.message(), "<html>nope</html>");
        assert_eq!(error.code(), None);
        assert_eq!(error.details(), None);
        assert_eq!(error.retry_after(), None);
    }
}

#[test]
fn given_unauthorized_with_empty_body_when_classified_then_reason_phrase_is_the_message() {
    let error = classify(HttpStatusCode::UNAUTHORIZED, b"  ", None);

    assert!(matches!(error, ApiError::Generic { .. }));
    assert_eq!(error.message(), "Unauthorized");
}

#[test]
fn given_json_array_body_when_classified_then_it_is_not_a_structured_error() {
    let error = classify(HttpStatusCode::BAD_REQUEST, br#"["oops"]"#, None);

    assert!(matches!(error, ApiError::Generic { .. }));
    assert_eq!(error.message(), r#"["oops"]"#);
    assert_eq!(error.code(), None);
}

#[test]
fn given_rate_limit_with_hint_when_classified_then_retry_after_is_exposed() {
    let error = classify(
        HttpStatusCode::TOO_MANY_REQUESTS,
        br#"{"message":"slow down"}"#,
        Some(Duration::from_secs(7)),
    );

    assert_eq!(error.retry_after(), Some(Duration::from_secs(7)));
    assert_eq!(error.message(), "slow down");
}

#[test]
fn given_retry_after_seconds_when_parsed_then_duration_is_returned() {
    let mut headers = HeaderMap::new();
    headers.insert(RETRY_AFTER, HeaderValue::from_static(" 30 "));

    assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(30)));
}

#[test]
fn given_retry_after_http_date_when_parsed_then_it_is_ignored() {
    let mut headers = HeaderMap::new();
    headers.insert(
        RETRY_AFTER,
        HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"),
    );

    assert_eq!(parse_retry_after(&headers), None);
    assert_eq!(parse_retry_after(&HeaderMap::new()), None);
}

#[test]
fn given_classified_error_when_formatted_then_includes_location() {
    let error = classify(HttpStatusCode::FORBIDDEN, br#"{"message":"no"}"#, None);

    let message = error.to_string();

    assert!(message.contains("Forbidden Error"));
    assert!(message.contains("HTTP 403"));
    assert!(message.contains("classify.rs"));
}
