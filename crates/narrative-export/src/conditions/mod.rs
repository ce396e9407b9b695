/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Condition and action rendering.

mod dialect;
mod engine;

pub use dialect::{DialectPreset, ScriptDialect};
pub use engine::{NodeRenderer, SnippetNode, StepScope};
