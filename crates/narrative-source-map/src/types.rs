//! Core location types

use serde::{Deserialize, Serialize};

/// Identifier of a source registered in a [`crate::SourceContext`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub usize);

/// A location in source text (0-indexed)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Location {
    /// Byte offset from start of source
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in characters)
    pub column: usize,
}

impl Location {
    /// One-based `(line, column)` pair as shown to template authors.
    pub fn line_col(&self) -> (usize, usize) {
        (self.row + 1, self.column + 1)
    }
}

/// A half-open range in source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Start location (inclusive)
    pub start: Location,
    /// End location (exclusive)
    pub end: Location,
}

impl Range {
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_ordering() {
        let first = Location {
            offset: 0,
            row: 0,
            column: 0,
        };
        let second = Location {
            offset: 10,
            row: 1,
            column: 0,
        };
        assert!(first < second);
    }

    #[test]
    fn test_line_col_is_one_based() {
        let loc = Location {
            offset: 12,
            row: 2,
            column: 4,
        };
        assert_eq!(loc.line_col(), (3, 5));
    }

    #[test]
    fn test_range_len() {
        let range = Range {
            start: Location {
                offset: 3,
                row: 0,
                column: 3,
            },
            end: Location {
                offset: 8,
                row: 0,
                column: 8,
            },
        };
        assert_eq!(range.len(), 5);
        assert!(!range.is_empty());
        assert!(Range::default().is_empty());
    }
}
