//! Record body wire format.
//!
//! Line 1 of every record body names the next record in the chain as
//! `"{container_id} {record_id}"` in decimal; `"0 0"` is the terminal
//! sentinel. Every following line is one codec-produced payload fragment.
//! Sizes are measured in units (Unicode scalar values), because that is what
//! the medium limits.

use crate::error::CoreError;
use crate::pointer::RecordPointer;

/// Ceiling for a full record body, in units.
pub const MAX_RECORD_UNITS: usize = 2000;

/// Ceiling for a single payload line, in units.
pub const MAX_LINE_UNITS: usize = 1900;

/// Widest possible header line: two `u64::MAX` ids and a separating space.
pub const MAX_HEADER_UNITS: usize = 41;

/// Length of `text` in units.
pub fn units(text: &str) -> usize {
    text.chars().count()
}

/// Render the header line pointing at `next`.
pub fn format_header(next: RecordPointer) -> String {
    format!("{} {}", next.container_id, next.record_id)
}

/// Parse the header line of a record body.
pub fn parse_header(body: &str) -> Result<RecordPointer, CoreError> {
    let line = body.lines().next().unwrap_or("");
    let malformed = || CoreError::MalformedHeader(line.to_string());

    let mut parts = line.split(' ');
    let (Some(container), Some(record), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };
    let container_id: u64 = container.parse().map_err(|_| malformed())?;
    let record_id: u64 = record.parse().map_err(|_| malformed())?;
    Ok(RecordPointer::new(container_id, record_id))
}

/// Iterate the payload lines of a record body, header stripped.
pub fn payload_lines(body: &str) -> impl Iterator<Item = &str> {
    body.lines().skip(1)
}

/// Compose a full record body from a header pointer and a payload section.
///
/// The section is expected to come from the packing planner and to end with
/// a newline when non-empty; the composed body is checked against the
/// record ceiling.
pub fn compose_body(next: RecordPointer, section: &str) -> Result<String, CoreError> {
    let body = format!("{}\n{}", format_header(next), section);
    let total = units(&body);
    if total > MAX_RECORD_UNITS {
        return Err(CoreError::BodyTooLarge {
            units: total,
            limit: MAX_RECORD_UNITS,
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_header_terminal() {
        assert_eq!(format_header(RecordPointer::TERMINAL), "0 0");
        assert!(parse_header("0 0\nrest").unwrap().is_terminal());
    }

    #[test]
    fn test_header_parse_strips_payload() {
        let ptr = parse_header("12 34\nline one\nline two").unwrap();
        assert_eq!(ptr, RecordPointer::new(12, 34));
    }

    #[test]
    fn test_header_malformed() {
        for body in ["", "12", "12 34 56\nx", "a b", "12 -3", "12.0 5"] {
            assert!(matches!(
                parse_header(body),
                Err(CoreError::MalformedHeader(_))
            ));
        }
    }

    #[test]
    fn test_payload_lines_skip_header() {
        let lines: Vec<&str> = payload_lines("0 0\na\nb").collect();
        assert_eq!(lines, vec!["a", "b"]);
        assert_eq!(payload_lines("0 0").count(), 0);
    }

    #[test]
    fn test_compose_body_round_trips_header() {
        let next = RecordPointer::new(7, 9);
        let body = compose_body(next, "payload\n").unwrap();
        assert_eq!(parse_header(&body).unwrap(), next);
        assert_eq!(payload_lines(&body).collect::<Vec<_>>(), vec!["payload"]);
    }

    #[test]
    fn test_compose_body_enforces_ceiling() {
        let section: String = "x".repeat(MAX_RECORD_UNITS);
        assert!(matches!(
            compose_body(RecordPointer::TERMINAL, &section),
            Err(CoreError::BodyTooLarge { .. })
        ));
    }

    #[test]
    fn test_max_header_units_is_wide_enough() {
        let widest = format_header(RecordPointer::new(u64::MAX, u64::MAX));
        assert_eq!(units(&widest), MAX_HEADER_UNITS);
    }

    proptest! {
        #[test]
        fn prop_header_round_trip(container_id: u64, record_id: u64) {
            let ptr = RecordPointer::new(container_id, record_id);
            let parsed = parse_header(&format_header(ptr)).unwrap();
            prop_assert_eq!(ptr, parsed);
        }
    }
}
