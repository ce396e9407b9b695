//! Builder API for diagnostic messages.

use crate::catalog::get_error_info;
use crate::diagnostic::{DiagnosticKind, DiagnosticMessage};
use narrative_source_map::SourceInfo;

/// Builder for [`DiagnosticMessage`].
///
/// # Example
///
/// ```
/// use narrative_error_reporting::DiagnosticMessageBuilder;
///
/// let error = DiagnosticMessageBuilder::error("Unsupported condition code")
///     .with_code("NE-3-1")
///     .problem("Inventory condition operator `7` is not known")
///     .add_hint("Was the project data written by a newer version?")
///     .build();
///
/// assert_eq!(error.code.as_deref(), Some("NE-3-1"));
/// assert_eq!(error.hints.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    kind: DiagnosticKind,
    title: String,
    code: Option<String>,
    problem: Option<String>,
    hints: Vec<String>,
    location: Option<SourceInfo>,
}

impl DiagnosticMessageBuilder {
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            code: None,
            problem: None,
            hints: Vec::new(),
            location: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Start from a catalog entry: the title comes from the catalog, and
    /// its message template is the problem until [`Self::problem`] replaces
    /// it. Unknown codes use the code itself as the title.
    ///
    /// ```
    /// use narrative_error_reporting::{DiagnosticKind, DiagnosticMessageBuilder};
    ///
    /// let msg = DiagnosticMessageBuilder::catalogued(DiagnosticKind::Error, "NE-4-1").build();
    /// assert_eq!(msg.title, "XSS Detected");
    /// assert_eq!(msg.code.as_deref(), Some("NE-4-1"));
    /// assert!(msg.problem.is_some());
    /// ```
    pub fn catalogued(kind: DiagnosticKind, code: &str) -> Self {
        match get_error_info(code) {
            Some(info) => Self::new(kind, info.title.clone())
                .with_code(code)
                .problem(info.message_template.clone()),
            None => Self::new(kind, code).with_code(code),
        }
    }

    /// Set the catalog code (`NE-<subsystem>-<number>`).
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the problem statement: what went wrong, in one sentence.
    pub fn problem(mut self, stmt: impl Into<String>) -> Self {
        self.problem = Some(stmt.into());
        self
    }

    /// Add a hint for fixing the problem. Hints suggesting an action end with `?`.
    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn with_location(mut self, location: SourceInfo) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the location only when one is known.
    pub fn with_optional_location(mut self, location: Option<SourceInfo>) -> Self {
        self.location = location;
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        DiagnosticMessage {
            code: self.code,
            title: self.title,
            kind: self.kind,
            problem: self.problem,
            hints: self.hints,
            location: self.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_error() {
        let msg = DiagnosticMessageBuilder::error("Test error").build();
        assert_eq!(msg.title, "Test error");
        assert_eq!(msg.kind, DiagnosticKind::Error);
        assert!(msg.location.is_none());
    }

    #[test]
    fn test_builder_location() {
        let msg = DiagnosticMessageBuilder::warning("Test")
            .with_location(SourceInfo::default())
            .build();
        assert_eq!(msg.kind, DiagnosticKind::Warning);
        assert!(msg.location.is_some());

        let msg = DiagnosticMessageBuilder::error("Test")
            .with_optional_location(None)
            .build();
        assert!(msg.location.is_none());
    }

    #[test]
    fn test_catalogued_problem_is_replaceable() {
        let default = DiagnosticMessageBuilder::catalogued(DiagnosticKind::Warning, "NE-1-2").build();
        assert_eq!(default.title, "Missing Include Template");
        assert_eq!(
            default.problem.as_deref(),
            Some("The included template does not exist in this project")
        );

        let specific = DiagnosticMessageBuilder::catalogued(DiagnosticKind::Warning, "NE-1-2")
            .problem("include template `Header` does not exist")
            .build();
        assert_eq!(specific.problem.as_deref(), Some("include template `Header` does not exist"));
    }

    #[test]
    fn test_catalogued_unknown_code() {
        let msg = DiagnosticMessageBuilder::catalogued(DiagnosticKind::Error, "NE-9-9").build();
        assert_eq!(msg.title, "NE-9-9");
        assert_eq!(msg.code.as_deref(), Some("NE-9-9"));
        assert!(msg.problem.is_none());
    }
}
