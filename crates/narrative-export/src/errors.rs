/*
 * errors.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Diagnostics of one export call.
//!
//! [`ExportPlaceholderErrorCollection`] wraps the template engine's
//! [`DiagnosticCollector`], so diagnostics from the object template, the
//! dialog template, snippet templates and includes all land in one place
//! together with the sources their spans point into.

use crate::codes;
use narrative_error_reporting::DiagnosticMessage;
use narrative_template::DiagnosticCollector;
use narrative_template::codes as template_codes;
use serde::Serialize;
use std::fmt::Write;

/// What went wrong, one variant per catalog code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExportPlaceholderErrorType {
    SyntaxError,
    MissingIncludeTemplate,
    IncludeLoadFailed,
    RecursiveInclude,
    UnresolvedPlaceholder,
    LanguageKeysUnavailable,
    FieldNotFoundDefaultUsed,
    AmbiguousFieldAlias,
    UnsupportedConditionOrActionCode,
    MissingExportTemplate,
    BrokenDialogLink,
    XssDetected,
    Internal,
}

impl ExportPlaceholderErrorType {
    /// Map a catalog code to its kind. Unknown or missing codes are internal.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(template_codes::SYNTAX_ERROR) => Self::SyntaxError,
            Some(template_codes::MISSING_INCLUDE) => Self::MissingIncludeTemplate,
            Some(template_codes::INCLUDE_LOAD_FAILED) => Self::IncludeLoadFailed,
            Some(template_codes::RECURSIVE_INCLUDE) => Self::RecursiveInclude,
            Some(template_codes::UNRESOLVED_PLACEHOLDER) => Self::UnresolvedPlaceholder,
            Some(template_codes::LANGUAGE_KEYS_UNAVAILABLE) => Self::LanguageKeysUnavailable,
            Some(codes::FIELD_NOT_FOUND_DEFAULT_USED) => Self::FieldNotFoundDefaultUsed,
            Some(codes::AMBIGUOUS_FIELD_ALIAS) => Self::AmbiguousFieldAlias,
            Some(codes::UNSUPPORTED_CODE) => Self::UnsupportedConditionOrActionCode,
            Some(codes::MISSING_EXPORT_TEMPLATE) => Self::MissingExportTemplate,
            Some(codes::BROKEN_DIALOG_LINK) => Self::BrokenDialogLink,
            Some(codes::XSS_DETECTED) => Self::XssDetected,
            _ => Self::Internal,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::SyntaxError => template_codes::SYNTAX_ERROR,
            Self::MissingIncludeTemplate => template_codes::MISSING_INCLUDE,
            Self::IncludeLoadFailed => template_codes::INCLUDE_LOAD_FAILED,
            Self::RecursiveInclude => template_codes::RECURSIVE_INCLUDE,
            Self::UnresolvedPlaceholder => template_codes::UNRESOLVED_PLACEHOLDER,
            Self::LanguageKeysUnavailable => template_codes::LANGUAGE_KEYS_UNAVAILABLE,
            Self::FieldNotFoundDefaultUsed => codes::FIELD_NOT_FOUND_DEFAULT_USED,
            Self::AmbiguousFieldAlias => codes::AMBIGUOUS_FIELD_ALIAS,
            Self::UnsupportedConditionOrActionCode => codes::UNSUPPORTED_CODE,
            Self::MissingExportTemplate => codes::MISSING_EXPORT_TEMPLATE,
            Self::BrokenDialogLink => codes::BROKEN_DIALOG_LINK,
            Self::XssDetected => codes::XSS_DETECTED,
            Self::Internal => codes::INTERNAL,
        }
    }
}

/// One entry of the error list returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPlaceholderError {
    #[serde(rename = "type")]
    pub kind: ExportPlaceholderErrorType,
    pub message: String,
}

/// Append-only diagnostics of one export call.
#[derive(Debug, Default)]
pub struct ExportPlaceholderErrorCollection {
    collector: DiagnosticCollector,
}

impl ExportPlaceholderErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collector(&self) -> &DiagnosticCollector {
        &self.collector
    }

    /// The underlying collector, for renderers recording into it.
    pub(crate) fn collector_mut(&mut self) -> &mut DiagnosticCollector {
        &mut self.collector
    }

    pub fn diagnostics(&self) -> &[DiagnosticMessage] {
        self.collector.diagnostics()
    }

    /// `{kind, message}` pairs in insertion order.
    ///
    /// The message is the diagnostic's problem statement (its title when
    /// there is none), followed by ` at name(line,col)` when the diagnostic
    /// has a location.
    pub fn to_error_list(&self) -> Vec<ExportPlaceholderError> {
        let sources = self.collector.sources();
        self.collector
            .diagnostics()
            .iter()
            .map(|diagnostic| {
                let mut message = match &diagnostic.problem {
                    Some(problem) => problem.as_str().to_string(),
                    None => diagnostic.title.clone(),
                };
                if let Some(location) = &diagnostic.location {
                    let _ = write!(message, " at {}", sources.format_span(location));
                }
                ExportPlaceholderError {
                    kind: ExportPlaceholderErrorType::from_code(diagnostic.code.as_deref()),
                    message,
                }
            })
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.collector.has_errors()
    }

    pub fn count_kind(&self, kind: ExportPlaceholderErrorType) -> usize {
        self.collector.count_code(kind.code())
    }

    pub fn len(&self) -> usize {
        self.collector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collector.is_empty()
    }

    /// Human-readable rendering of all diagnostics, with source snippets.
    pub fn render_text(&self) -> String {
        let sources = self.collector.sources();
        self.collector
            .diagnostics()
            .iter()
            .map(|d| d.to_text(Some(sources)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
