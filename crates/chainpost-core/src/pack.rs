//! Pure packing: turn codec lines into record-sized payload sections.
//!
//! Packing never touches the medium. The engine validates the plan here
//! first, then performs the create/edit calls in a separate mutation phase,
//! so an oversize payload fails before any side effect.

use crate::error::CoreError;
use crate::wire::{units, MAX_HEADER_UNITS, MAX_LINE_UNITS, MAX_RECORD_UNITS};

/// Split `text` into chunks of at most `limit` units.
///
/// Chunks split on scalar-value boundaries, never inside a code point.
/// Empty input yields no chunks.
pub fn chunk_units(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for ch in text.chars() {
        if count == limit {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Reject any payload line over the per-line ceiling.
///
/// This is the pre-mutation check: the engine runs it before fetching or
/// writing anything, so a too-large payload leaves the chain untouched.
pub fn check_lines(lines: &[String]) -> Result<(), CoreError> {
    for line in lines {
        let n = units(line);
        if n > MAX_LINE_UNITS {
            return Err(CoreError::LineTooLong {
                units: n,
                limit: MAX_LINE_UNITS,
            });
        }
    }
    Ok(())
}

/// Greedily pack payload lines into record payload sections.
///
/// `carry` is leftover payload already sitting in the chain's tail record;
/// it is placed at the front of the first section so the tail keeps filling
/// before any new record is allocated. A section never exceeds a full line
/// plus its trailing newline ([`MAX_LINE_UNITS`] + 1 units), which together
/// with the widest header stays under the record ceiling. The result always
/// has at least one section: the first one replaces the tail record's
/// payload, each further section becomes a new record.
pub fn plan_sections(lines: &[String], carry: Option<&str>) -> Result<Vec<String>, CoreError> {
    check_lines(lines)?;

    let mut sections = Vec::new();
    let mut current = match carry {
        Some(c) if !c.is_empty() => {
            let mut s = c.to_string();
            if !s.ends_with('\n') {
                s.push('\n');
            }
            s
        }
        _ => String::new(),
    };
    let mut current_units = units(&current);

    for line in lines {
        let n = units(line);
        if current_units + n + 1 <= MAX_LINE_UNITS {
            current.push_str(line);
            current.push('\n');
            current_units += n + 1;
        } else {
            sections.push(std::mem::take(&mut current));
            current.push_str(line);
            current.push('\n');
            current_units = n + 1;
        }
    }
    sections.push(current);

    // The widest header plus any section must fit one record.
    for section in &sections {
        let total = units(section) + MAX_HEADER_UNITS + 1;
        if total > MAX_RECORD_UNITS {
            return Err(CoreError::BodyTooLarge {
                units: total,
                limit: MAX_RECORD_UNITS,
            });
        }
    }

    Ok(sections)
}
