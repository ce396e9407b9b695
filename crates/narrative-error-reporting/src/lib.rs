//! Diagnostic messages for narrative export.
//!
//! Rendering an export never stops at the first problem: template syntax
//! errors, missing includes and unresolved placeholders are all collected as
//! [`DiagnosticMessage`]s and handed back next to the (partial) output.
//!
//! Messages follow a tidyverse-like structure:
//! - a short **title**, optionally tagged with a catalog **code** (`NE-1-2`)
//! - a **problem** statement
//! - **hints** for fixing it
//! - an optional source **location** into a registered template
//!
//! # Example
//!
//! ```
//! use narrative_error_reporting::DiagnosticMessageBuilder;
//!
//! let msg = DiagnosticMessageBuilder::warning("Missing include template")
//!     .with_code("NE-1-2")
//!     .problem("Include `Header` does not exist in this project")
//!     .add_hint("Create the include template or fix its name?")
//!     .build();
//!
//! assert!(msg.to_text(None).contains("Warning [NE-1-2]: Missing include template"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info, get_subsystem};
pub use diagnostic::{DiagnosticKind, DiagnosticMessage};
