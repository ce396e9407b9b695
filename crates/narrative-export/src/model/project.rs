/*
 * project.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Projects and their export settings.

use crate::conditions::DialectPreset;
use narrative_template::DEFAULT_MAX_INCLUDE_DEPTH;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Per-project export configuration.
///
/// Every member has a default, so a settings file only needs to name what
/// it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Extension of script exports, without the dot.
    pub script_extension: String,
    /// Extension of language file exports, without the dot.
    pub language_file_extension: String,
    pub dialect: DialectPreset,
    /// Prefix of generated language keys.
    pub language_key_prefix: String,
    pub max_include_depth: usize,
    /// Report unresolved placeholders as errors instead of warnings.
    pub strict_mode: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            script_extension: "lua".to_string(),
            language_file_extension: "txt".to_string(),
            dialect: DialectPreset::default(),
            language_key_prefix: "L".to_string(),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            strict_mode: false,
        }
    }
}
