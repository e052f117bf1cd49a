//! Strong types for addressing records in the medium.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a single record: the container it lives in and its id there.
///
/// Pointers are immutable handles; the record they name can change (the
/// engine edits its own tail in place) but the pointer identity never does.
/// The pair `{0, 0}` is reserved as the terminal sentinel ending a chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordPointer {
    pub container_id: u64,
    pub record_id: u64,
}

impl RecordPointer {
    /// The sentinel pointer marking the end of a chain.
    pub const TERMINAL: Self = Self {
        container_id: 0,
        record_id: 0,
    };

    /// Create a pointer from raw ids.
    pub const fn new(container_id: u64, record_id: u64) -> Self {
        Self {
            container_id,
            record_id,
        }
    }

    /// Whether this is the terminal sentinel.
    pub const fn is_terminal(&self) -> bool {
        self.container_id == 0 && self.record_id == 0
    }
}

impl fmt::Debug for RecordPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecordPointer({}/{})",
            self.container_id, self.record_id
        )
    }
}

impl fmt::Display for RecordPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container_id, self.record_id)
    }
}

impl From<(u64, u64)> for RecordPointer {
    fn from((container_id, record_id): (u64, u64)) -> Self {
        Self::new(container_id, record_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_sentinel() {
        assert!(RecordPointer::TERMINAL.is_terminal());
        assert!(RecordPointer::new(0, 0).is_terminal());
        assert!(!RecordPointer::new(0, 1).is_terminal());
        assert!(!RecordPointer::new(1, 0).is_terminal());
    }

    #[test]
    fn test_pointer_display() {
        let ptr = RecordPointer::new(12, 34);
        assert_eq!(format!("{}", ptr), "12/34");
        assert_eq!(format!("{:?}", ptr), "RecordPointer(12/34)");
    }
}
