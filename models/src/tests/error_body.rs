use crate::ApiErrorBody;

/// **VALUE**: Verifies the structured error body binds the `error` key to `code`.
///
/// **WHY THIS MATTERS**: Callers branch on machine codes; the wire key is `error`.
///
/// **BUG THIS CATCHES**: Would catch the rename attribute being removed.
#[test]
fn given_structured_error_when_parsed_then_code_and_details_bound() {
    let body = br#"{"status":"error","message":"bad name","error":"VALIDATION_FAILED","details":"name too long"}"#;

    let parsed = ApiErrorBody::parse(body).unwrap();

    assert_eq!(parsed.message, "bad name");
    assert_eq!(parsed.code.as_deref(), Some("VALIDATION_FAILED"));
    assert_eq!(parsed.details.as_deref(), Some("name too long"));
}

/// **VALUE**: Verifies non-structured bodies are rejected.
///
/// **WHY THIS MATTERS**: Proxies return HTML or plain text error pages; those must fall back
/// to the raw text rather than produce an empty message.
///
/// **BUG THIS CATCHES**: Would catch arbitrary JSON (e.g. an array) being accepted as an error body.
#[test]
fn given_unstructured_bodies_when_parsed_then_returns_none() {
    assert!(ApiErrorBody::parse(b"<html>Bad Gateway</html>").is_none());
    assert!(ApiErrorBody::parse(b"[1,2,3]").is_none());
    assert!(ApiErrorBody::parse(br#"{"unrelated":true}"#).is_none());
    assert!(ApiErrorBody::parse(b"").is_none());
}

/// **VALUE**: Verifies blank messages are treated as absent.
///
/// **BUG THIS CATCHES**: Would catch `"message": "  "` surfacing as a blank error string.
#[test]
fn given_blank_message_when_non_empty_message_called_then_none() {
    let parsed = ApiErrorBody::parse(br#"{"status":"error","message":"  "}"#).unwrap();
    assert!(parsed.non_empty_message().is_none());
}
