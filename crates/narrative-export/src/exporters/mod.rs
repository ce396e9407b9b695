/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Exporters turning one object into one artifact.
//!
//! Every exporter returns an [`ExportObjectResult`] as long as it could
//! produce output, even when diagnostics were recorded along the way. Only
//! the failures listed on [`ExportError`] abort an export.

mod json;
mod language;
mod script;
mod service;

pub use json::{FlexFieldJsonExport, ItemJsonExport, JsonExporter, NpcJsonExport, SkillJsonExport};
pub use language::LanguageExporter;
pub use script::ScriptExporter;
pub use service::ExportService;

use crate::error::ExportError;
use crate::errors::{ExportPlaceholderError, ExportPlaceholderErrorCollection};
use crate::model::{ExportObjectData, ExportTemplate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output of one export.
#[derive(Debug, Serialize)]
pub struct ExportObjectResult {
    pub code: String,
    /// Extension of the artifact, without the dot.
    pub file_extension: String,
    pub errors: Vec<ExportPlaceholderError>,
    #[serde(skip)]
    diagnostics: ExportPlaceholderErrorCollection,
}

impl ExportObjectResult {
    pub fn new(
        code: String,
        file_extension: impl Into<String>,
        diagnostics: ExportPlaceholderErrorCollection,
    ) -> Self {
        Self {
            code,
            file_extension: file_extension.into(),
            errors: diagnostics.to_error_list(),
            diagnostics,
        }
    }

    /// The full diagnostics behind `errors`, with their sources.
    ///
    /// The collection is closed once the export returns.
    pub fn diagnostics(&self) -> &ExportPlaceholderErrorCollection {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

#[async_trait]
pub trait ObjectExporter: Send + Sync {
    /// Export `data`.
    ///
    /// `template` overrides the project's template for the object's type.
    /// Exporters that don't render templates ignore it.
    async fn export(
        &self,
        template: Option<&ExportTemplate>,
        data: &ExportObjectData,
    ) -> Result<ExportObjectResult, ExportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Script,
    Json,
    #[serde(rename = "language")]
    LanguageFile,
}

impl ExportFormat {
    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Script => "script",
            ExportFormat::Json => "json",
            ExportFormat::LanguageFile => "language",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [ExportFormat::Script, ExportFormat::Json, ExportFormat::LanguageFile]
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| format!("unknown export format `{}`, expected script, json or language", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_snapshots_diagnostics() {
        let mut diagnostics = ExportPlaceholderErrorCollection::new();
        diagnostics.collector_mut().error_with_code(
            crate::codes::MISSING_EXPORT_TEMPLATE,
            "no `dialog` template",
            None,
        );
        let result = ExportObjectResult::new("code".into(), "lua", diagnostics);

        assert!(result.has_errors());
        assert_eq!(result.errors, result.diagnostics().to_error_list());
        assert_eq!(result.diagnostics().len(), 1);
        assert_eq!(result.file_extension, "lua");
    }

    #[test]
    fn test_format_names() {
        assert_eq!("language".parse::<ExportFormat>(), Ok(ExportFormat::LanguageFile));
        assert_eq!(ExportFormat::Json.to_string(), "json");
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(serde_json::to_string(&ExportFormat::LanguageFile).unwrap(), "\"language\"");
    }
}
