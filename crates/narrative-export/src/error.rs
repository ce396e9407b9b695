/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Hard export failures.
//!
//! Most problems found during an export are diagnostics and still produce
//! output. The variants here abort the export.

use crate::codes;
use crate::model::TemplateType;
use crate::store::StoreError;
use narrative_error_reporting::{DiagnosticKind, DiagnosticMessage, DiagnosticMessageBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// User-authored text contains markup that could execute script.
    #[error("Possible cross-site scripting in {location}")]
    XssDetected { location: String },

    /// The project or its export settings could not be loaded.
    #[error("Project lookup failed: {0}")]
    Project(#[source] StoreError),

    /// The exporter's own top-level template could not be fetched.
    #[error("Template `{template_type}` could not be loaded: {source}")]
    Template {
        template_type: TemplateType,
        #[source]
        source: StoreError,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Convert to a diagnostic for reporting alongside export diagnostics.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            ExportError::XssDetected { location } => DiagnosticMessageBuilder::catalogued(
                DiagnosticKind::Error,
                codes::XSS_DETECTED,
            )
            .problem(format!("markup that could execute script was found in {}", location))
            .add_hint("Remove script tags, event handlers and `javascript:` links from the text")
            .build(),
            other => DiagnosticMessageBuilder::catalogued(DiagnosticKind::Error, codes::INTERNAL)
                .problem(other.to_string())
                .build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_xss_diagnostic() {
        let err = ExportError::XssDetected {
            location: "dialog step `s1`".into(),
        };
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.code.as_deref(), Some("NE-4-1"));
        assert_eq!(
            diagnostic.summary(None),
            "XSS Detected: markup that could execute script was found in dialog step `s1`"
        );
    }
}
