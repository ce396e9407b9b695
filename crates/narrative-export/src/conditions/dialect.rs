/*
 * dialect.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Spelling of boolean logic in the target scripting language.

use crate::model::conditions::{compare_operator, group_operator};
use serde::{Deserialize, Serialize};

/// Tokens used when condition code is assembled outside of templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptDialect {
    pub and: &'static str,
    pub or: &'static str,
    /// Prefix negating the following call, including any separating space.
    pub not: &'static str,
    pub group_open: &'static str,
    pub group_close: &'static str,
    pub true_literal: &'static str,
    pub false_literal: &'static str,
    pub null_literal: &'static str,
    pub equal: &'static str,
    pub not_equal: &'static str,
    pub less: &'static str,
    pub less_or_equal: &'static str,
    pub greater: &'static str,
    pub greater_or_equal: &'static str,
}

impl ScriptDialect {
    pub const fn lua() -> Self {
        Self {
            and: "and",
            or: "or",
            not: "not ",
            group_open: "(",
            group_close: ")",
            true_literal: "true",
            false_literal: "false",
            null_literal: "nil",
            equal: "==",
            not_equal: "~=",
            less: "<",
            less_or_equal: "<=",
            greater: ">",
            greater_or_equal: ">=",
        }
    }

    pub const fn c_like() -> Self {
        Self {
            and: "&&",
            or: "||",
            not: "!",
            group_open: "(",
            group_close: ")",
            true_literal: "true",
            false_literal: "false",
            null_literal: "null",
            equal: "==",
            not_equal: "!=",
            less: "<",
            less_or_equal: "<=",
            greater: ">",
            greater_or_equal: ">=",
        }
    }

    /// Token for a [`compare_operator`] code.
    pub fn compare(&self, operator: u8) -> Option<&'static str> {
        match operator {
            compare_operator::EQUAL => Some(self.equal),
            compare_operator::NOT_EQUAL => Some(self.not_equal),
            compare_operator::LESS => Some(self.less),
            compare_operator::LESS_OR_EQUAL => Some(self.less_or_equal),
            compare_operator::GREATER => Some(self.greater),
            compare_operator::GREATER_OR_EQUAL => Some(self.greater_or_equal),
            _ => None,
        }
    }

    /// Token for a [`group_operator`] code.
    pub fn group_join(&self, operator: u8) -> Option<&'static str> {
        match operator {
            group_operator::AND => Some(self.and),
            group_operator::OR => Some(self.or),
            _ => None,
        }
    }

    pub fn bool_literal(&self, value: bool) -> &'static str {
        if value { self.true_literal } else { self.false_literal }
    }

    /// Join rendered children inside the group delimiters.
    ///
    /// ```
    /// use narrative_export::conditions::ScriptDialect;
    ///
    /// let parts = ["a".to_string(), "b".to_string()];
    /// assert_eq!(ScriptDialect::c_like().group(0, &parts).as_deref(), Some("(a && b)"));
    /// assert_eq!(ScriptDialect::lua().group(0, &parts).as_deref(), Some("(a and b)"));
    /// ```
    pub fn group(&self, operator: u8, parts: &[String]) -> Option<String> {
        let join = self.group_join(operator)?;
        Some(format!(
            "{}{}{}",
            self.group_open,
            parts.join(&format!(" {} ", join)),
            self.group_close
        ))
    }
}

impl Default for ScriptDialect {
    fn default() -> Self {
        Self::lua()
    }
}

/// Named dialect, as written in export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectPreset {
    #[default]
    Lua,
    CLike,
}

impl DialectPreset {
    pub fn dialect(self) -> ScriptDialect {
        match self {
            DialectPreset::Lua => ScriptDialect::lua(),
            DialectPreset::CLike => ScriptDialect::c_like(),
        }
    }
}
