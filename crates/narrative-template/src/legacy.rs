/*
 * legacy.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Legacy placeholder substitution.
//!
//! Templates using the legacy rendering engine have no control flow: every
//! `{{ Dotted.Path }}` is replaced textually with the value at that path.
//! The same substitution backs the fast path for condition and action kinds
//! that don't need a full template pass.

use crate::codes;
use crate::context::TemplateContext;
use crate::eval_context::EvalContext;
use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+)*)\s*\}\}")
        .expect("placeholder pattern is valid")
});

/// A placeholder that `lookup` could not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedPlaceholder {
    pub path: String,
    /// Byte offsets of the whole `{{ ... }}` in the source.
    pub start: usize,
    pub end: usize,
}

/// Replace every `{{ Dotted.Path }}` in `source` with `lookup(path)`.
///
/// Unresolved placeholders are replaced with nothing and returned in source
/// order. Text that is not a well-formed placeholder is left untouched.
///
/// ```
/// use narrative_template::substitute_placeholders;
///
/// let (text, unresolved) = substitute_placeholders("wait({{ amount }}){{ x }}", |path| {
///     (path == "amount").then(|| "3".to_string())
/// });
/// assert_eq!(text, "wait(3)");
/// assert_eq!(unresolved[0].path, "x");
/// ```
pub fn substitute_placeholders(
    source: &str,
    mut lookup: impl FnMut(&str) -> Option<String>,
) -> (String, Vec<UnresolvedPlaceholder>) {
    let mut out = String::with_capacity(source.len());
    let mut unresolved = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(source) {
        let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&source[last..whole.start()]);
        match lookup(path.as_str()) {
            Some(value) => out.push_str(&value),
            None => unresolved.push(UnresolvedPlaceholder {
                path: path.as_str().to_string(),
                start: whole.start(),
                end: whole.end(),
            }),
        }
        last = whole.end();
    }
    out.push_str(&source[last..]);

    (out, unresolved)
}

/// Fill a legacy template from `vars`, recording unresolved placeholders.
///
/// `name` is used for the diagnostic spans.
pub fn fill_legacy_placeholders(
    source: &str,
    name: &str,
    vars: &TemplateContext,
    ctx: &mut EvalContext<'_>,
) -> String {
    let (text, unresolved) = substitute_placeholders(source, |path| {
        let segments: Vec<&str> = path.split('.').collect();
        vars.get_path(&segments).map(|v| v.render())
    });

    if !unresolved.is_empty() {
        let file_id = ctx.diagnostics.add_source(name, source);
        for placeholder in unresolved {
            let location =
                ctx.diagnostics
                    .sources()
                    .source_info(file_id, placeholder.start, placeholder.end);
            let problem = format!("placeholder `{}` could not be resolved", placeholder.path);
            match (location, ctx.strict_mode) {
                (Some(location), _) => {
                    ctx.warn_or_error_with_code(codes::UNRESOLVED_PLACEHOLDER, problem, &location)
                }
                (None, true) => {
                    ctx.diagnostics
                        .error_with_code(codes::UNRESOLVED_PLACEHOLDER, problem, None)
                }
                (None, false) => {
                    ctx.diagnostics
                        .warn_with_code(codes::UNRESOLVED_PLACEHOLDER, problem, None)
                }
            }
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TemplateValue;
    use crate::eval_context::DiagnosticCollector;
    use crate::resolver::NullResolver;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_non_placeholders_untouched() {
        let source = "if a then {{ not a path! }} {x} end";
        let (text, unresolved) = substitute_placeholders(source, |_| Some("X".into()));
        assert_eq!(text, source);
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_fill_from_context() {
        let vars = TemplateContext::new().with(
            "value_object",
            TemplateValue::map([("amount", 5.into()), ("unit", "seconds".into())]),
        );
        let mut diagnostics = DiagnosticCollector::new();
        let text = {
            let mut ctx = EvalContext::new(&mut diagnostics, &NullResolver);
            fill_legacy_placeholders(
                "Wait({{value_object.amount}}, \"{{ value_object.unit }}\")",
                "ActionWait",
                &vars,
                &mut ctx,
            )
        };
        assert_eq!(text, "Wait(5, \"seconds\")");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unresolved_is_reported_with_span() {
        let mut diagnostics = DiagnosticCollector::new();
        {
            let mut ctx = EvalContext::new(&mut diagnostics, &NullResolver);
            let text = fill_legacy_placeholders(
                "Hello\n  {{ Npc.Name }}!",
                "Legacy",
                &TemplateContext::new(),
                &mut ctx,
            );
            assert_eq!(text, "Hello\n  !");
        }
        assert_eq!(
            diagnostics.summaries(),
            vec!["Unresolved Placeholder: placeholder `Npc.Name` could not be resolved at Legacy(2,3)"]
        );
    }
}
