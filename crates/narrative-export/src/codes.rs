/*
 * codes.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Catalog codes for diagnostics raised outside the template engine.

pub const FIELD_NOT_FOUND_DEFAULT_USED: &str = "NE-2-1";
pub const AMBIGUOUS_FIELD_ALIAS: &str = "NE-2-2";
pub const UNSUPPORTED_CODE: &str = "NE-3-1";
pub const MISSING_EXPORT_TEMPLATE: &str = "NE-3-2";
pub const BROKEN_DIALOG_LINK: &str = "NE-3-3";
pub const XSS_DETECTED: &str = "NE-4-1";
pub const INTERNAL: &str = "NE-0-1";

#[cfg(test)]
mod tests {
    use super::*;
    use narrative_error_reporting::get_error_info;

    #[test]
    fn test_codes_are_catalogued() {
        for code in [
            FIELD_NOT_FOUND_DEFAULT_USED,
            AMBIGUOUS_FIELD_ALIAS,
            UNSUPPORTED_CODE,
            MISSING_EXPORT_TEMPLATE,
            BROKEN_DIALOG_LINK,
            XSS_DETECTED,
            INTERNAL,
        ] {
            assert!(get_error_info(code).is_some(), "{code}");
        }
    }
}
