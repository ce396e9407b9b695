/*
 * pipes.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Value transformations applied by `{{ expr | pipe }}`.
//!
//! `langkey` is handled by the evaluator since it needs the evaluation
//! context; every other pipe is a pure function of its input and arguments.

use crate::ast::PipeKind;
use crate::context::TemplateValue;

/// Apply a context-free pipe. `args` are already evaluated.
pub(crate) fn apply_pipe(kind: PipeKind, value: TemplateValue, args: &[TemplateValue]) -> TemplateValue {
    match kind {
        PipeKind::Upcase => map_text(value, |s| s.to_uppercase()),
        PipeKind::Downcase => map_text(value, |s| s.to_lowercase()),
        PipeKind::Capitalize => map_text(value, capitalize),
        PipeKind::Escape => map_text(value, escape_script_string),
        PipeKind::Default => {
            let empty = match &value {
                TemplateValue::Null => true,
                TemplateValue::String(s) => s.is_empty(),
                _ => false,
            };
            if empty {
                args.first().cloned().unwrap_or_default()
            } else {
                value
            }
        }
        PipeKind::Join => {
            let separator = args.first().map(TemplateValue::render).unwrap_or_default();
            match value {
                TemplateValue::List(items) => TemplateValue::String(
                    items
                        .iter()
                        .map(TemplateValue::render)
                        .collect::<Vec<_>>()
                        .join(&separator),
                ),
                other => other,
            }
        }
        PipeKind::Size => {
            let size = match &value {
                TemplateValue::List(items) => items.len(),
                TemplateValue::Map(m) => m.len(),
                TemplateValue::String(s) => s.chars().count(),
                TemplateValue::Null => 0,
                TemplateValue::Number(_) | TemplateValue::Bool(_) => 1,
            };
            TemplateValue::from(size)
        }
        PipeKind::LangKey => value,
    }
}

/// Text pipes leave lists element-wise transformed and render other values first.
fn map_text(value: TemplateValue, f: impl Fn(&str) -> String + Copy) -> TemplateValue {
    match value {
        TemplateValue::Null => TemplateValue::Null,
        TemplateValue::List(items) => {
            TemplateValue::List(items.into_iter().map(|v| map_text(v, f)).collect())
        }
        other => TemplateValue::String(f(&other.render())),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Escape text for use inside a double-quoted string literal of the target script.
pub fn escape_script_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_case_pipes() {
        assert_eq!(
            apply_pipe(PipeKind::Upcase, "grom".into(), &[]),
            TemplateValue::from("GROM")
        );
        assert_eq!(
            apply_pipe(PipeKind::Capitalize, "ärger".into(), &[]),
            TemplateValue::from("Ärger")
        );
        assert_eq!(
            apply_pipe(PipeKind::Downcase, TemplateValue::Null, &[]),
            TemplateValue::Null
        );
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape_script_string("He said \"hi\"\nbye\\"),
            "He said \\\"hi\\\"\\nbye\\\\"
        );
    }

    #[test]
    fn test_default() {
        let fallback = [TemplateValue::from("Nobody")];
        assert_eq!(
            apply_pipe(PipeKind::Default, TemplateValue::Null, &fallback),
            TemplateValue::from("Nobody")
        );
        assert_eq!(
            apply_pipe(PipeKind::Default, "".into(), &fallback),
            TemplateValue::from("Nobody")
        );
        assert_eq!(
            apply_pipe(PipeKind::Default, 0.into(), &fallback),
            TemplateValue::from(0)
        );
    }

    #[test]
    fn test_join_and_size() {
        let list = TemplateValue::List(vec!["a".into(), 2.into(), "c".into()]);
        assert_eq!(
            apply_pipe(PipeKind::Join, list.clone(), &[", ".into()]),
            TemplateValue::from("a, 2, c")
        );
        assert_eq!(apply_pipe(PipeKind::Size, list, &[]), TemplateValue::from(3));
        assert_eq!(
            apply_pipe(PipeKind::Size, "Grom".into(), &[]),
            TemplateValue::from(4)
        );
    }
}
