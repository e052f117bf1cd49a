//! Proptest strategies for payload data.

use proptest::prelude::*;

use chainpost_core::MAX_LINE_UNITS;

/// A payload line that fits the per-line ceiling: printable, no newlines.
pub fn payload_line() -> impl Strategy<Value = String> {
    "[ -~]{0,200}"
}

/// A list of payload lines, as a codec would emit them.
pub fn payload_lines() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(payload_line(), 0..32)
}

/// Free-form text of up to a few records' worth of units, including
/// multibyte characters.
pub fn payload_text() -> impl Strategy<Value = String> {
    ".{0,4096}"
}

/// A line at exactly the per-line ceiling, for boundary tests.
pub fn full_width_line() -> impl Strategy<Value = String> {
    Just("x".repeat(MAX_LINE_UNITS))
}
