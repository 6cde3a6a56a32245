use common::{ErrorLocation, RedactError};

use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Read Error: {path}: {source} {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Parse Error: {path}: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Config Environment Error: {variable}: {reason} {location}")]
    EnvError {
        location: ErrorLocation,
        variable: String,
        reason: String,
    },

    #[error("Config Invalid URL Error: {url}: {reason} {location}")]
    InvalidUrl {
        location: ErrorLocation,
        url: String,
        reason: String,
    },

    #[error("Config HTTP Client Error: {reason} {location}")]
    HttpClient {
        location: ErrorLocation,
        reason: String,
    },

    #[error("Config Validation Error: {reason} {location}")]
    ValidationError {
        location: ErrorLocation,
        reason: String,
    },
}

impl From<reqwest::Error> for ConfigError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        ConfigError::HttpClient {
            location: ErrorLocation::from(Location::caller()),
            reason: error.to_string(),
        }
    }
}

impl From<RedactError> for ConfigError {
    #[track_caller]
    fn from(error: RedactError) -> Self {
        let reason = match error {
            RedactError::Serialization { message, .. } | RedactError::Empty { message, .. } => {
                message
            }
        };
        ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason,
        }
    }
}
