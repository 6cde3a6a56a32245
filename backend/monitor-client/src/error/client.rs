use crate::error::{ApiError, ConfigError};

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// Every failure a call through [`crate::Client`] can end in.
///
/// - `Config`, `InvalidRequest`: pre-flight, no network attempt was made
/// - `Cancelled`, `DeadlineExceeded`: the caller's [`crate::CallContext`] ended the call
/// - `Transport`: connection-level failure that outlived the attempt budget
/// - `Api`: classified non-2xx response
/// - `Decode`: 2xx body that does not match the expected envelope
#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid Request Error: {message} {location}")]
    InvalidRequest {
        message: String,
        location: ErrorLocation,
    },

    #[error("Cancelled Error: call cancelled by caller {location}")]
    Cancelled { location: ErrorLocation },

    #[error("Deadline Exceeded Error: call deadline elapsed {location}")]
    DeadlineExceeded { location: ErrorLocation },

    #[error("Transport Error: {message} (after {attempts} attempt(s)) {location}")]
    Transport {
        message: String,
        attempts: u32,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Decode Error: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    #[track_caller]
    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        ClientError::InvalidRequest {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn transport(source: reqwest::Error, attempts: u32) -> Self {
        ClientError::Transport {
            message: source.to_string(),
            attempts,
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_not_found)
    }

    /// True when the caller's context, not the server or network, ended the call.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            ClientError::Cancelled { .. } | ClientError::DeadlineExceeded { .. }
        )
    }

    /// Number of dispatches made before a transport failure was surfaced.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            ClientError::Transport { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ClientError::Decode {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: error,
        }
    }
}
