//! Registry of template sources

use crate::file_info::FileInformation;
use crate::source_info::SourceInfo;
use crate::types::{FileId, Range};
use serde::{Deserialize, Serialize};

/// A registered template source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Display name (template type or include name)
    pub name: String,
    pub content: String,
    pub file_info: FileInformation,
}

/// All sources touched by one render, indexed by [`FileId`].
///
/// Ids are handed out sequentially, so diagnostics collected across several
/// templates of the same export can all be resolved against one context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceContext {
    files: Vec<SourceFile>,
}

impl SourceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source and return its id.
    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<String>) -> FileId {
        let content = content.into();
        let file_info = FileInformation::new(&content);
        let id = FileId(self.files.len());
        self.files.push(SourceFile {
            name: name.into(),
            content,
            file_info,
        });
        id
    }

    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Build a [`SourceInfo`] for the byte range `start..end` of a registered file.
    pub fn source_info(&self, id: FileId, start: usize, end: usize) -> Option<SourceInfo> {
        let file = self.get_file(id)?;
        let start = file.file_info.offset_to_location(&file.content, start)?;
        let end = file.file_info.offset_to_location(&file.content, end)?;
        Some(SourceInfo::new(id, Range { start, end }))
    }

    /// Human-readable `name(line,column)` span for the start of `info`.
    ///
    /// Unknown files fall back to `<unknown>` so a stale location never
    /// hides the diagnostic it belongs to.
    pub fn format_span(&self, info: &SourceInfo) -> String {
        let (line, column) = info.range.start.line_col();
        match self.get_file(info.file_id) {
            Some(file) => format!("{}({},{})", file.name, line, column),
            None => format!("<unknown>({},{})", line, column),
        }
    }
}
