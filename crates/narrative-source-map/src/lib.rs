//! Source locations for narrative export templates
//!
//! Templates are registered in a [`SourceContext`] under their template name.
//! Every AST node and diagnostic carries a [`SourceInfo`] pointing back into
//! one of those registered sources, which lets callers print spans such as
//! `NpcTemplate(3,14)` or render a full source snippet.
//!
//! # Example
//!
//! ```rust
//! use narrative_source_map::*;
//!
//! let mut ctx = SourceContext::new();
//! let file_id = ctx.add_file("Greeting", "Hello\n{{ object.name }}");
//!
//! let info = ctx.source_info(file_id, 6, 23).unwrap();
//! assert_eq!(ctx.format_span(&info), "Greeting(2,1)");
//! ```

pub mod context;
pub mod file_info;
pub mod source_info;
pub mod types;

pub use context::{SourceContext, SourceFile};
pub use file_info::FileInformation;
pub use source_info::SourceInfo;
pub use types::{FileId, Location, Range};
