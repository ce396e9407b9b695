//! Error code catalog and lookup.
//!
//! Codes follow the format `NE-<subsystem>-<number>`:
//! `0` internal, `1` template engine, `2` object model, `3` condition and
//! action rendering, `4` content safety.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for an error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Subsystem name (e.g., "template", "object-model")
    pub subsystem: String,

    /// Short title for the error
    pub title: String,

    /// Problem statement used until a diagnostic states its own
    pub message_template: String,

    /// When this error was introduced (version)
    pub since_version: String,
}

/// Global error catalog, embedded at compile time from `error_catalog.json`.
///
/// # Panics
///
/// Panics on first access if the embedded JSON is invalid, which can only
/// happen when the catalog file is edited incorrectly.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data).expect("Invalid error catalog JSON")
});

/// Look up error code information.
///
/// ```
/// use narrative_error_reporting::catalog::get_error_info;
///
/// let info = get_error_info("NE-1-2").unwrap();
/// assert_eq!(info.title, "Missing Include Template");
/// ```
pub fn get_error_info(code: &str) -> Option<&ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

/// Get the subsystem name for an error code.
///
/// ```
/// use narrative_error_reporting::catalog::get_subsystem;
///
/// assert_eq!(get_subsystem("NE-0-1"), Some("internal"));
/// ```
pub fn get_subsystem(code: &str) -> Option<&str> {
    ERROR_CATALOG.get(code).map(|info| info.subsystem.as_str())
}
