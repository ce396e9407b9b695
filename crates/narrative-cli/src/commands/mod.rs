//! Command implementations for the narrative-export CLI
//!
//! Each command module handles the CLI interface and delegates to
//! narrative-export for the actual work.

pub mod export;
pub mod placeholders;
