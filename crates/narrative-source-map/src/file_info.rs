//! Line index for offset to row/column conversion

use crate::types::Location;
use serde::{Deserialize, Serialize};

/// Line start table for one source text.
///
/// Offsets are resolved with a binary search over the line starts; columns
/// are counted in characters so that spans stay correct for non-ASCII text
/// such as localized dialog lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInformation {
    /// Byte offset at which each line begins. Always starts with 0.
    line_starts: Vec<usize>,

    /// Total length of the source in bytes
    total_length: usize,
}

impl FileInformation {
    /// Index the line starts of `content`.
    ///
    /// ```
    /// use narrative_source_map::FileInformation;
    ///
    /// let info = FileInformation::new("a\nb\nc");
    /// assert_eq!(info.line_count(), 3);
    /// ```
    pub fn new(content: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            content
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(idx, _)| idx + 1),
        );

        FileInformation {
            line_starts,
            total_length: content.len(),
        }
    }

    /// Convert a byte offset in `content` into a [`Location`].
    ///
    /// `content` must be the text this index was built from. Returns `None`
    /// when the offset is past the end or not on a character boundary.
    ///
    /// ```
    /// use narrative_source_map::FileInformation;
    ///
    /// let text = "hello\nwörld";
    /// let info = FileInformation::new(text);
    /// let loc = info.offset_to_location(text, 9).unwrap();
    /// assert_eq!((loc.row, loc.column), (1, 2));
    /// ```
    pub fn offset_to_location(&self, content: &str, offset: usize) -> Option<Location> {
        if offset > self.total_length || !content.is_char_boundary(offset) {
            return None;
        }

        let row = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[row];
        let column = content[line_start..offset].chars().count();

        Some(Location {
            offset,
            row,
            column,
        })
    }

    pub fn total_length(&self) -> usize {
        self.total_length
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
