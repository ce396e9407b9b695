//! Core diagnostic message types.

use narrative_source_map::{SourceContext, SourceInfo};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// A problem in the input. The export still produces output.
    Error,
    /// Output was produced with a substitute, e.g. an unresolved placeholder
    /// left in place.
    Warning,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
        }
    }
}

/// A diagnostic message.
///
/// A catalog `code` with its `title`, a one-sentence `problem` saying what
/// went wrong in this instance, hints for fixing it (ending with `?` when
/// they suggest an action) and the span in a registered template source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub title: String,

    pub kind: DiagnosticKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

impl DiagnosticMessage {
    /// A bare message with just a kind and title.
    ///
    /// Use [`crate::DiagnosticMessageBuilder`] for anything more.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            hints: Vec::new(),
            location: None,
        }
    }

    /// One-line summary: the title, followed by the problem statement and
    /// the formatted span when available.
    ///
    /// ```
    /// use narrative_error_reporting::DiagnosticMessageBuilder;
    /// use narrative_source_map::SourceContext;
    ///
    /// let mut sources = SourceContext::new();
    /// let id = sources.add_file("Npc", "{{ if }}");
    /// let msg = DiagnosticMessageBuilder::error("Template syntax error")
    ///     .problem("expected an expression after `if`")
    ///     .with_location(sources.source_info(id, 3, 5).unwrap())
    ///     .build();
    ///
    /// assert_eq!(
    ///     msg.summary(Some(&sources)),
    ///     "Template syntax error: expected an expression after `if` at Npc(1,4)"
    /// );
    /// ```
    pub fn summary(&self, ctx: Option<&SourceContext>) -> String {
        let mut result = self.title.clone();
        if let Some(problem) = &self.problem {
            let _ = write!(result, ": {}", problem);
        }
        if let (Some(location), Some(ctx)) = (&self.location, ctx) {
            let _ = write!(result, " at {}", ctx.format_span(location));
        }
        result
    }

    /// Render as text for a terminal.
    ///
    /// With a source context and a location the span is shown as an ariadne
    /// snippet labelled with the problem. Hints follow, one per line.
    ///
    /// ```
    /// use narrative_error_reporting::DiagnosticMessageBuilder;
    ///
    /// let msg = DiagnosticMessageBuilder::error("Invalid input")
    ///     .problem("Values must be numeric")
    ///     .add_hint("Convert to numbers first?")
    ///     .build();
    /// let text = msg.to_text(None);
    /// assert!(text.contains("Error: Invalid input"));
    /// assert!(text.contains("Values must be numeric"));
    /// ```
    pub fn to_text(&self, ctx: Option<&SourceContext>) -> String {
        let snippet = match (&self.location, ctx) {
            (Some(location), Some(ctx)) => self.render_snippet(location, ctx),
            _ => None,
        };

        let mut result = match snippet {
            Some(snippet) => snippet,
            None => {
                let mut header = String::new();
                match &self.code {
                    Some(code) => {
                        let _ = writeln!(header, "{} [{}]: {}", self.kind.label(), code, self.title);
                    }
                    None => {
                        let _ = writeln!(header, "{}: {}", self.kind.label(), self.title);
                    }
                }
                if let Some(problem) = &self.problem {
                    let _ = writeln!(header, "{}", problem);
                }
                header
            }
        };

        for hint in &self.hints {
            let _ = writeln!(result, "? {}", hint);
        }

        let trimmed_len = result.trim_end_matches('\n').len();
        result.truncate(trimmed_len);
        result
    }

    /// Render as a JSON value. Locations are resolved to `name(line,col)`
    /// when a source context is given.
    pub fn to_json(&self, ctx: Option<&SourceContext>) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "kind": self.kind,
            "title": self.title,
        });
        if let Some(code) = &self.code {
            obj["code"] = code.as_str().into();
        }
        if let Some(problem) = &self.problem {
            obj["problem"] = problem.as_str().into();
        }
        if !self.hints.is_empty() {
            obj["hints"] = self.hints.clone().into();
        }
        if let (Some(location), Some(ctx)) = (&self.location, ctx) {
            obj["location"] = ctx.format_span(location).into();
        }
        obj
    }

    fn render_snippet(&self, location: &SourceInfo, ctx: &SourceContext) -> Option<String> {
        use ariadne::{Color, Config, Label, Report, ReportKind, Source};

        let file = ctx.get_file(location.file_id)?;

        let (report_kind, color) = match self.kind {
            DiagnosticKind::Error => (ReportKind::Error, Color::Red),
            DiagnosticKind::Warning => (ReportKind::Warning, Color::Yellow),
        };
        let message = match &self.code {
            Some(code) => format!("[{}] {}", code, self.title),
            None => self.title.clone(),
        };
        let label = self.problem.as_deref().unwrap_or(&self.title);

        let mut output = Vec::new();
        Report::build(report_kind, file.name.clone(), location.start_offset())
            .with_config(Config::default().with_color(false))
            .with_message(message)
            .with_label(
                Label::new((file.name.clone(), location.start_offset()..location.end_offset()))
                    .with_message(label)
                    .with_color(color),
            )
            .finish()
            .write((file.name.clone(), Source::from(file.content.as_str())), &mut output)
            .ok()?;

        String::from_utf8(output).ok()
    }
}
