//! Source information attached to AST nodes and diagnostics

use crate::types::{FileId, Location, Range};
use serde::{Deserialize, Serialize};

/// Where a piece of template text came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceInfo {
    pub file_id: FileId,
    pub range: Range,
}

impl SourceInfo {
    /// Create source info for a range in a registered source.
    pub fn new(file_id: FileId, range: Range) -> Self {
        SourceInfo { file_id, range }
    }

    /// Create source info from explicit start and end locations.
    pub fn from_locations(file_id: FileId, start: Location, end: Location) -> Self {
        SourceInfo {
            file_id,
            range: Range { start, end },
        }
    }

    pub fn start_offset(&self) -> usize {
        self.range.start.offset
    }

    pub fn end_offset(&self) -> usize {
        self.range.end.offset
    }

    /// Smallest source info covering both `self` and `other`.
    ///
    /// Both must point into the same file; otherwise `self` is returned.
    pub fn span_to(&self, other: &SourceInfo) -> SourceInfo {
        if self.file_id != other.file_id {
            return self.clone();
        }
        SourceInfo {
            file_id: self.file_id,
            range: Range {
                start: self.range.start.min(other.range.start),
                end: self.range.end.max(other.range.end),
            },
        }
    }
}
