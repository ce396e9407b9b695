/*
 * codes.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Catalog codes for diagnostics raised by the template engine.

pub const SYNTAX_ERROR: &str = "NE-1-1";
pub const MISSING_INCLUDE: &str = "NE-1-2";
pub const INCLUDE_LOAD_FAILED: &str = "NE-1-3";
pub const RECURSIVE_INCLUDE: &str = "NE-1-4";
pub const UNRESOLVED_PLACEHOLDER: &str = "NE-1-5";
pub const LANGUAGE_KEYS_UNAVAILABLE: &str = "NE-1-6";
