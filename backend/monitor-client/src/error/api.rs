//! Typed errors for non-2xx responses.
//!
//! Only the error classifier constructs these. Callers match on the variant
//! when they need to tell "not found" apart from everything else and treat the
//! rest as opaque failures.

use common::{ErrorLocation, HttpStatusCode};

use std::time::Duration;

use thiserror::Error as ThisError;

#[derive(Debug, Clone, ThisError)]
pub enum ApiError {
    #[error("Not Found Error: {message} (HTTP {status}) {location}")]
    NotFound {
        status: HttpStatusCode,
        message: String,
        code: Option<String>,
        details: Option<String>,
        location: ErrorLocation,
    },

    #[error("Validation Error: {message} (HTTP {status}) {location}")]
    Validation {
        status: HttpStatusCode,
        message: String,
        code: Option<String>,
        details: Option<String>,
        location: ErrorLocation,
    },

    #[error("Unauthorized Error: {message} (HTTP {status}) {location}")]
    Unauthorized {
        status: HttpStatusCode,
        message: String,
        code: Option<String>,
        details: Option<String>,
        location: ErrorLocation,
    },

    #[error("Forbidden Error: {message} (HTTP {status}) {location}")]
    Forbidden {
        status: HttpStatusCode,
        message: String,
        code: Option<String>,
        details: Option<String>,
        location: ErrorLocation,
    },

    #[error("Rate Limit Error: {message} (HTTP {status}) {location}")]
    RateLimit {
        status: HttpStatusCode,
        message: String,
        code: Option<String>,
        details: Option<String>,
        /// Server hint from the `Retry-After` header.
        retry_after: Option<Duration>,
        location: ErrorLocation,
    },

    #[error("API Error: {message} (HTTP {status}) {location}")]
    Generic {
        status: HttpStatusCode,
        message: String,
        code: Option<String>,
        details: Option<String>,
        location: ErrorLocation,
    },
}

impl ApiError {
    pub fn status(&self) -> HttpStatusCode {
        match self {
            ApiError::NotFound { status, .. }
            | ApiError::Validation { status, .. }
            | ApiError::Unauthorized { status, .. }
            | ApiError::Forbidden { status, .. }
            | ApiError::RateLimit { status, .. }
            | ApiError::Generic { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound { message, .. }
            | ApiError::Validation { message, .. }
            | ApiError::Unauthorized { message, .. }
            | ApiError::Forbidden { message, .. }
            | ApiError::RateLimit { message, .. }
            | ApiError::Generic { message, .. } => message,
        }
    }

    /// Machine-readable error code from the body's `error` field.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { code, .. }
            | ApiError::Validation { code, .. }
            | ApiError::Unauthorized { code, .. }
            | ApiError::Forbidden { code, .. }
            | ApiError::RateLimit { code, .. }
            | ApiError::Generic { code, .. } => code.as_deref(),
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { details, .. }
            | ApiError::Validation { details, .. }
            | ApiError::Unauthorized { details, .. }
            | ApiError::Forbidden { details, .. }
            | ApiError::RateLimit { details, .. }
            | ApiError::Generic { details, .. } => details.as_deref(),
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ApiError::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}
