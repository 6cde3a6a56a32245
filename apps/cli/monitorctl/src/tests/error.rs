use crate::error::{CliError, EXIT_CANCELLED};

use common::ErrorLocation;

use monitor_client::{ClientError, ConfigError};

use std::panic::Location;

#[test]
fn given_cancelled_call_when_mapped_to_exit_code_then_130() {
    let err = CliError::Client(ClientError::Cancelled {
        location: ErrorLocation::from(Location::caller()),
    });

    assert_eq!(err.exit_code(), EXIT_CANCELLED);
}

#[test]
fn given_config_error_when_converted_then_wrapped_as_client_error() {
    let err: CliError = ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: String::from("timeout must be greater than zero"),
    }
    .into();

    assert!(matches!(err, CliError::Client(ClientError::Config(_))));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("timeout must be greater than zero"));
}

#[test]
#[track_caller]
fn given_argument_error_when_formatted_then_includes_location() {
    let err = CliError::Argument {
        message: String::from("bad query"),
        location: ErrorLocation::from(Location::caller()),
    };

    let message = err.to_string();

    assert!(message.contains("Argument Error: bad query"));
    assert!(message.contains("error.rs"));
    assert_eq!(err.exit_code(), 2);
}
