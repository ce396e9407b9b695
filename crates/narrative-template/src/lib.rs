/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template engine for narrative exports.
//!
//! Export templates mix literal script text with code blocks:
//!
//! - Output: `{{ object.name }}`, with pipes `{{ object.name | upcase }}`
//! - Field and index access: `{{ object.fields.Health.value }}`, `{{ list[0] }}`
//! - Conditionals: `{{ if a && b }}...{{ else if c }}...{{ else }}...{{ end }}`
//! - Loops: `{{ for step in dialog.steps }}...{{ end }}` with `loop.index`,
//!   `loop.first` and `loop.last`
//! - Includes: `{{ include "Name" }}`
//! - Comments: `{{# comment }}`
//! - Whitespace trimming: `{{~ ... ~}}`
//!
//! # Architecture
//!
//! Rendering never fails. Syntax errors, unresolved placeholders and missing
//! includes are recorded in a [`DiagnosticCollector`] that also keeps every
//! parsed source, so diagnostics carry `name(line,column)` spans. A template
//! that fails to parse renders as empty text.
//!
//! Includes are resolved through the asynchronous [`IncludeResolver`] trait
//! while rendering, and cached per render in the [`EvalContext`].
//!
//! # Example
//!
//! ```
//! use narrative_template::{
//!     DiagnosticCollector, EvalContext, MemoryResolver, TemplateContext, TemplateValue,
//!     render_source,
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let resolver = MemoryResolver::with_includes([("Greeting", "Hello")]);
//! let vars = TemplateContext::new().with("object", TemplateValue::map([("name", "Grom".into())]));
//!
//! let mut diagnostics = DiagnosticCollector::new();
//! let mut ctx = EvalContext::new(&mut diagnostics, &resolver);
//! let output = render_source("{{ include \"Greeting\" }} {{ object.name }}", "Npc", &vars, &mut ctx).await;
//!
//! assert_eq!(output, "Hello Grom");
//! assert!(diagnostics.is_empty());
//! # });
//! ```

pub mod ast;
pub mod codes;
pub mod context;
pub mod error;
pub mod eval_context;
pub mod evaluator;
pub mod language_keys;
pub mod legacy;
mod lexer;
pub mod parser;
mod pipes;
pub mod resolver;

// Re-export main types at crate root
pub use ast::{
    BinaryOp, Comment, Conditional, Expr, ForLoop, Include, Literal, Output, PathSegment, Pipe,
    PipeKind, TemplateNode, VariableRef,
};
pub use context::{TemplateContext, TemplateValue, ValueMap};
pub use error::{TemplateError, TemplateResult};
pub use eval_context::{DEFAULT_MAX_INCLUDE_DEPTH, DiagnosticCollector, EvalContext};
pub use evaluator::{evaluate, render_source};
pub use language_keys::{LanguageKey, LanguageKeyGenerator, PrefixedLanguageKeyGenerator};
pub use legacy::{UnresolvedPlaceholder, fill_legacy_placeholders, substitute_placeholders};
pub use parser::Template;
pub use pipes::escape_script_string;
pub use resolver::{
    FileSystemResolver, INCLUDE_NOT_FOUND_SENTINEL, IncludeResolver, MemoryResolver, NullResolver,
    remove_final_newline,
};
