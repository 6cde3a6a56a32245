use common::ErrorLocation;

use monitor_client::{ClientError, ConfigError};

use thiserror::Error;

/// Exit status for a call ended by Ctrl-C or its deadline.
pub const EXIT_CANCELLED: u8 = 130;

/// Errors surfaced by `monitorctl` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Logger could not be set up
    #[error("Logger Error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    /// Malformed command-line input (query pair, header, JSON body)
    #[error("Argument Error: {message} {location}")]
    Argument {
        message: String,
        location: ErrorLocation,
    },

    /// Anything the request engine reports, configuration included
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Output Error: {message} {location}")]
    Output {
        message: String,
        location: ErrorLocation,
    },
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Client(error) if error.is_cancellation() => EXIT_CANCELLED,
            CliError::Argument { .. } => 2,
            _ => 1,
        }
    }
}

impl From<ConfigError> for CliError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        CliError::Client(ClientError::from(error))
    }
}
