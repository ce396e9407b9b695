/*
 * language_keys.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Language key generation for localized text.
//!
//! A script template can write `{{ object.name | langkey }}` to emit a key
//! instead of the raw text. The key/value pair is recorded on the
//! [`crate::EvalContext`], and the language file export renders all recorded
//! pairs afterwards.

use serde::Serialize;

/// Capability to turn a scoped field into a stable language key.
pub trait LanguageKeyGenerator: Send + Sync {
    /// Key for `field_name` of the object identified by `scope_id`.
    fn language_key(&self, scope_id: &str, field_name: &str) -> String;
}

/// A language key recorded while rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageKey {
    pub key: String,
    pub value: String,
}

/// Generates keys of the form `<prefix>_<scope>_<field>`.
///
/// Characters other than ASCII letters, digits and `_` are replaced with
/// `_` so the key is a valid identifier in every supported script dialect.
///
/// ```
/// use narrative_template::{LanguageKeyGenerator, PrefixedLanguageKeyGenerator};
///
/// let generator = PrefixedLanguageKeyGenerator::new("L");
/// assert_eq!(generator.language_key("npc-7", "Name"), "L_npc_7_Name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixedLanguageKeyGenerator {
    prefix: String,
}

impl PrefixedLanguageKeyGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl LanguageKeyGenerator for PrefixedLanguageKeyGenerator {
    fn language_key(&self, scope_id: &str, field_name: &str) -> String {
        let raw = if self.prefix.is_empty() {
            format!("{}_{}", scope_id, field_name)
        } else {
            format!("{}_{}_{}", self.prefix, scope_id, field_name)
        };
        raw.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect()
    }
}
