//! Maps non-2xx responses to the typed [`ApiError`] set.
//!
//! Pure: no retries, no I/O, no request state.

use crate::error::ApiError;

use common::{ErrorLocation, HttpStatusCode};
use models::ApiErrorBody;

use std::panic::Location;
use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};

pub const NOT_FOUND_MESSAGE: &str = "resource not found";
const VALIDATION_MESSAGE: &str = "validation failed";
const UNAUTHORIZED_MESSAGE: &str = "authentication required";
const FORBIDDEN_MESSAGE: &str = "access forbidden";
const RATE_LIMIT_MESSAGE: &str = "rate limit exceeded";

/// Classify a failed response.
///
/// A structured body lets the status pick the variant and supplies message,
/// code and details. Anything else (HTML, plain text, empty) yields
/// [`ApiError::Generic`] with the raw text, or the reason phrase, as the
/// message. Not-found messages are always normalized to [`NOT_FOUND_MESSAGE`].
#[track_caller]
pub fn classify(status: HttpStatusCode, body: &[u8], retry_after: Option<Duration>) -> ApiError {
    let location = ErrorLocation::from(Location::caller());

    let Some(error_body) = ApiErrorBody::parse(body) else {
        return ApiError::Generic {
            status,
            message: raw_text(body).unwrap_or_else(|| status.canonical_reason().to_string()),
            code: None,
            details: None,
            location,
        };
    };

    let server_message = error_body.non_empty_message().map(str::to_string);
    let ApiErrorBody { code, details, .. } = error_body;
    let message_or = |default: &str| server_message.clone().unwrap_or_else(|| default.to_string());

    match status.as_u16() {
        404 => ApiError::NotFound {
            status,
            message: NOT_FOUND_MESSAGE.to_string(),
            code,
            details,
            location,
        },
        400 | 422 => ApiError::Validation {
            status,
            message: message_or(VALIDATION_MESSAGE),
            code,
            details,
            location,
        },
        401 => ApiError::Unauthorized {
            status,
            message: message_or(UNAUTHORIZED_MESSAGE),
            code,
            details,
            location,
        },
        403 => ApiError::Forbidden {
            status,
            message: message_or(FORBIDDEN_MESSAGE),
            code,
            details,
            location,
        },
        429 => ApiError::RateLimit {
            status,
            message: message_or(RATE_LIMIT_MESSAGE),
            code,
            details,
            retry_after,
            location,
        },
        _ => ApiError::Generic {
            status,
            message: message_or(status.canonical_reason()),
            code,
            details,
            location,
        },
    }
}

/// `Retry-After` in its delta-seconds form. HTTP-date values are ignored.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn raw_text(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
