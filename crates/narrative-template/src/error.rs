/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template compilation and include loading.
//!
//! Rendering itself never fails: problems found while rendering are recorded
//! as diagnostics. These errors surface only from the standalone
//! [`crate::Template::compile`] API and from [`crate::IncludeResolver`]
//! implementations.

use narrative_source_map::SourceInfo;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template source is not valid template syntax.
    #[error("Syntax error: {message}")]
    Syntax {
        message: String,
        location: SourceInfo,
    },

    /// An include could not be read from its backing store.
    #[error("Include `{name}` could not be loaded: {message}")]
    IncludeLoad { name: String, message: String },

    /// I/O error (e.g., reading an include file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
