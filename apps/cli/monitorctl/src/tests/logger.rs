// Logger setup: idempotent install and file errors.

use crate::error::CliError;
use crate::logger::{dispatch, initialize};

use std::path::PathBuf;

use log::LevelFilter;

/// **VALUE**: Verifies that calling initialize() twice doesn't panic or fail.
///
/// **BUG THIS CATCHES**: Would catch the Once or AtomicBool guards being removed,
/// causing fern to fail when setting a global logger twice.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A writable log file location
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let log_file = temp_dir.path().join("monitorctl.log");

    // WHEN: Calling initialize twice
    let first = initialize(LevelFilter::Debug, Some(&log_file));
    let second = initialize(LevelFilter::Debug, Some(&log_file));

    // THEN: Both succeed
    assert!(first.is_ok(), "First initialization should succeed");
    assert!(second.is_ok(), "Second initialization should be a no-op");
}

/// **VALUE**: Verifies an unwritable log file is reported instead of panicking.
#[test]
fn given_invalid_log_path_when_building_dispatch_then_returns_logger_error() {
    // GIVEN: A path that cannot be created on Unix-like systems
    let invalid = PathBuf::from("/dev/null/invalid-path/monitorctl.log");

    // WHEN
    let result = dispatch(LevelFilter::Info, Some(&invalid));

    // THEN
    assert!(matches!(result, Err(CliError::Logger { .. })));
}

#[test]
fn given_no_log_file_when_building_dispatch_then_succeeds() {
    assert!(dispatch(LevelFilter::Warn, None).is_ok());
}
