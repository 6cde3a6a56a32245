use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: Every error in the workspace embeds an ErrorLocation. If it captures
/// the wrong position, a failed request can no longer be traced back to the code that built it.
///
/// **BUG THIS CATCHES**: Would catch if `Location::caller()` stops being propagated or if the
/// file/line/column fields are swapped or zeroed.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN: The current source position
    let expected_line = line!() + 3;

    // WHEN: Creating ErrorLocation from caller
    let location = ErrorLocation::from(Location::caller());

    // THEN: Should capture this file and line
    assert!(location.file.contains("error_location.rs"));
    assert_eq!(location.line, expected_line);
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies the Display format used inside every error message.
///
/// **WHY THIS MATTERS**: Error strings are grepped in logs. The "[file:line:column]" suffix is
/// the anchor people search for.
///
/// **BUG THIS CATCHES**: Would catch if Display drops the brackets or one of the fields.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation::from(Location::caller());

    // WHEN: Formatting as string
    let formatted = format!("{location}");

    // THEN: Should produce "[file:line:column]"
    assert!(formatted.starts_with('['));
    assert!(formatted.ends_with(']'));
    assert!(formatted.contains(&format!(":{}:{}", location.line, location.column)));
}
