/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template evaluation engine.
//!
//! This module evaluates parsed templates against a [`TemplateContext`].
//! Evaluation is asynchronous because includes are loaded lazily: the
//! evaluator awaits the [`crate::IncludeResolver`] at each include site.
//! Evaluation never fails; problems are recorded in the [`EvalContext`].

use crate::ast::{
    BinaryOp, Conditional, Expr, ForLoop, Include, Output, PathSegment, PipeKind, TemplateNode,
    VariableRef,
};
use crate::codes;
use crate::context::{TemplateContext, TemplateValue};
use crate::eval_context::{CachedInclude, DiagnosticCollector, EvalContext};
use crate::parser::Template;
use crate::pipes::apply_pipe;
use crate::resolver::{INCLUDE_NOT_FOUND_SENTINEL, NullResolver, remove_final_newline};
use narrative_source_map::SourceInfo;
use std::cmp::Ordering;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future used for recursive evaluation.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

impl Template {
    /// Render this template, recording diagnostics in `ctx`.
    pub async fn render_with(&self, vars: &TemplateContext, ctx: &mut EvalContext<'_>) -> String {
        evaluate(&self.nodes, vars, ctx).await
    }

    /// Render this template without includes, discarding diagnostics.
    ///
    /// ```
    /// use narrative_template::{Template, TemplateContext, TemplateValue};
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
    /// let template = Template::compile("Hello {{ object.name }}").unwrap();
    /// let vars = TemplateContext::new()
    ///     .with("object", TemplateValue::map([("name", "Grom".into())]));
    /// assert_eq!(template.render(&vars).await, "Hello Grom");
    /// # });
    /// ```
    pub async fn render(&self, vars: &TemplateContext) -> String {
        let mut diagnostics = DiagnosticCollector::new();
        let mut ctx = EvalContext::new(&mut diagnostics, &NullResolver);
        self.render_with(vars, &mut ctx).await
    }
}

/// Parse `source` and render it in one step.
///
/// A template that fails to parse renders as empty text; its syntax error
/// is recorded in the context's collector.
pub async fn render_source(
    source: &str,
    name: &str,
    vars: &TemplateContext,
    ctx: &mut EvalContext<'_>,
) -> String {
    match Template::parse(source, name, &mut *ctx.diagnostics) {
        Some(template) => template.render_with(vars, ctx).await,
        None => String::new(),
    }
}

/// Evaluate a list of template nodes.
pub fn evaluate<'a, 'r: 'a>(
    nodes: &'a [TemplateNode],
    vars: &'a TemplateContext,
    ctx: &'a mut EvalContext<'r>,
) -> BoxFuture<'a, String> {
    Box::pin(async move {
        let mut out = String::new();
        for node in nodes {
            evaluate_node(node, vars, ctx, &mut out).await;
        }
        out
    })
}

async fn evaluate_node(
    node: &TemplateNode,
    vars: &TemplateContext,
    ctx: &mut EvalContext<'_>,
    out: &mut String,
) {
    match node {
        TemplateNode::Literal(lit) => out.push_str(&lit.text),
        TemplateNode::Output(output) => out.push_str(&evaluate_output(output, vars, ctx)),
        TemplateNode::Conditional(cond) => evaluate_conditional(cond, vars, ctx, out).await,
        TemplateNode::ForLoop(for_loop) => evaluate_for_loop(for_loop, vars, ctx, out).await,
        TemplateNode::Include(include) => evaluate_include(include, vars, ctx, out).await,
        TemplateNode::Comment(_) => {}
    }
}

fn evaluate_output(output: &Output, vars: &TemplateContext, ctx: &mut EvalContext<'_>) -> String {
    let defaulted = output
        .pipes
        .first()
        .is_some_and(|p| p.kind == PipeKind::Default);

    let mut value = match eval_expr(&output.expr, vars) {
        Some(value) => value,
        None => {
            if let Expr::Variable(var) = &output.expr
                && !defaulted
            {
                ctx.warn_or_error_with_code(
                    codes::UNRESOLVED_PLACEHOLDER,
                    format!("placeholder `{}` could not be resolved", var.display()),
                    &var.source_info,
                );
            }
            TemplateValue::Null
        }
    };

    for pipe in &output.pipes {
        value = match pipe.kind {
            PipeKind::LangKey => match &output.expr {
                Expr::Variable(var) => language_key(var, value, vars, ctx, &pipe.source_info),
                _ => value,
            },
            kind => {
                let args: Vec<TemplateValue> = pipe
                    .args
                    .iter()
                    .map(|arg| eval_expr(arg, vars).unwrap_or_default())
                    .collect();
                apply_pipe(kind, value, &args)
            }
        };
    }

    value.render()
}

/// Replace `value` with its language key and record the pair.
///
/// The key's scope is the path without its last segment; the scope's `id`
/// member identifies it.
fn language_key(
    var: &VariableRef,
    value: TemplateValue,
    vars: &TemplateContext,
    ctx: &mut EvalContext<'_>,
    location: &SourceInfo,
) -> TemplateValue {
    if value.is_null() {
        return value;
    }
    let Some(names) = var.field_names() else {
        return value;
    };
    let Some((field_name, scope)) = names.split_last() else {
        return value;
    };
    let Some(generator) = ctx.language_key_generator else {
        ctx.warn_with_code(
            codes::LANGUAGE_KEYS_UNAVAILABLE,
            format!(
                "`{}` uses `langkey` but this export does not generate language keys",
                var.display()
            ),
            location,
        );
        return value;
    };

    let scope_id = vars
        .get_path(scope)
        .and_then(|s| s.get_field("id"))
        .map(TemplateValue::render)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| scope.join("_"));
    let key = generator.language_key(&scope_id, field_name);
    ctx.record_language_key(key.clone(), value.render());
    TemplateValue::String(key)
}

async fn evaluate_conditional(
    cond: &Conditional,
    vars: &TemplateContext,
    ctx: &mut EvalContext<'_>,
    out: &mut String,
) {
    for (condition, body) in &cond.branches {
        if eval_expr(condition, vars).is_some_and(|v| v.is_truthy()) {
            out.push_str(&evaluate(body, vars, ctx).await);
            return;
        }
    }
    if let Some(else_body) = &cond.else_branch {
        out.push_str(&evaluate(else_body, vars, ctx).await);
    }
}

async fn evaluate_for_loop(
    for_loop: &ForLoop,
    vars: &TemplateContext,
    ctx: &mut EvalContext<'_>,
    out: &mut String,
) {
    let value = match eval_expr(&for_loop.iterable, vars) {
        Some(value) => value,
        None => {
            if let Expr::Variable(var) = &for_loop.iterable {
                ctx.warn_or_error_with_code(
                    codes::UNRESOLVED_PLACEHOLDER,
                    format!("loop source `{}` could not be resolved", var.display()),
                    &var.source_info,
                );
            }
            return;
        }
    };

    let items = match value {
        TemplateValue::List(items) => items,
        // Single iteration for maps and truthy scalars
        other if other.is_truthy() => vec![other],
        _ => Vec::new(),
    };

    let count = items.len();
    for (index, item) in items.into_iter().enumerate() {
        let mut child = vars.child();
        child.insert(&for_loop.binding, item);
        child.insert(
            "loop",
            TemplateValue::map([
                ("index", TemplateValue::from(index)),
                ("first", TemplateValue::Bool(index == 0)),
                ("last", TemplateValue::Bool(index + 1 == count)),
            ]),
        );
        out.push_str(&evaluate(&for_loop.body, &child, ctx).await);
    }
}

async fn evaluate_include(
    include: &Include,
    vars: &TemplateContext,
    ctx: &mut EvalContext<'_>,
    out: &mut String,
) {
    let name = include.name.as_str();

    if ctx.include_depth >= ctx.max_include_depth {
        if !ctx.include_overflow {
            ctx.include_overflow = true;
            ctx.error_with_code(
                codes::RECURSIVE_INCLUDE,
                format!(
                    "including `{}` exceeds the maximum include depth of {}",
                    name, ctx.max_include_depth
                ),
                &include.source_info,
            );
        }
        return;
    }
    if ctx.include_overflow && ctx.include_depth > 0 {
        return;
    }

    let entry = match ctx.cached_include(name) {
        Some(entry) => {
            tracing::debug!(include = name, "include cache hit");
            entry
        }
        None => {
            let entry = load_include(include, ctx).await;
            ctx.cache_include(name, entry.clone());
            entry
        }
    };

    match entry {
        CachedInclude::Loaded(template) => {
            ctx.include_depth += 1;
            let text = evaluate(&template.nodes, vars, ctx).await;
            ctx.include_depth -= 1;
            out.push_str(&text);
        }
        CachedInclude::Missing | CachedInclude::Failed => out.push_str(INCLUDE_NOT_FOUND_SENTINEL),
        CachedInclude::Invalid => {}
    }
}

/// Load and parse an include, recording why it is unusable if it is.
async fn load_include(include: &Include, ctx: &mut EvalContext<'_>) -> CachedInclude {
    let name = include.name.as_str();
    tracing::debug!(include = name, "loading include template");

    let resolver = ctx.resolver;
    match resolver.load(name).await {
        Ok(Some(source)) => {
            match Template::parse(remove_final_newline(&source), name, &mut *ctx.diagnostics) {
                Some(template) => CachedInclude::Loaded(Arc::new(template)),
                None => CachedInclude::Invalid,
            }
        }
        Ok(None) => {
            ctx.error_with_code(
                codes::MISSING_INCLUDE,
                format!("include template `{}` does not exist", name),
                &include.source_info,
            );
            CachedInclude::Missing
        }
        Err(e) => {
            tracing::warn!(include = name, error = %e, "include template could not be loaded");
            ctx.error_with_code(
                codes::INCLUDE_LOAD_FAILED,
                format!("include template `{}` could not be loaded: {}", name, e),
                &include.source_info,
            );
            CachedInclude::Failed
        }
    }
}

/// Evaluate an expression. `None` means a variable could not be resolved.
fn eval_expr(expr: &Expr, vars: &TemplateContext) -> Option<TemplateValue> {
    match expr {
        Expr::Literal { value, .. } => Some(value.clone()),
        Expr::Variable(var) => resolve_variable(var, vars).cloned(),
        Expr::Not { operand, .. } => Some(TemplateValue::Bool(
            !eval_expr(operand, vars).is_some_and(|v| v.is_truthy()),
        )),
        Expr::Binary {
            op, left, right, ..
        } => {
            let truthy = |e: &Expr| eval_expr(e, vars).is_some_and(|v| v.is_truthy());
            let result = match op {
                BinaryOp::And => truthy(left) && truthy(right),
                BinaryOp::Or => truthy(left) || truthy(right),
                _ => {
                    let l = eval_expr(left, vars).unwrap_or_default();
                    let r = eval_expr(right, vars).unwrap_or_default();
                    compare(*op, &l, &r)
                }
            };
            Some(TemplateValue::Bool(result))
        }
    }
}

fn resolve_variable<'v>(var: &VariableRef, vars: &'v TemplateContext) -> Option<&'v TemplateValue> {
    let mut segments = var.path.iter();
    let mut current = match segments.next()? {
        PathSegment::Field(name) => vars.get(name)?,
        PathSegment::Index(_) => return None,
    };
    for segment in segments {
        current = match segment {
            PathSegment::Field(name) => current.get_field(name)?,
            PathSegment::Index(index) => match (current, eval_expr(index, vars)?) {
                (TemplateValue::List(_), TemplateValue::Number(n)) if n >= 0.0 && n.fract() == 0.0 => {
                    current.get_index(n as usize)?
                }
                (TemplateValue::Map(_), key) => current.get_field(&key.render())?,
                _ => return None,
            },
        };
    }
    Some(current)
}

/// Numeric view of a value; numeric strings count since flex field values are text.
fn as_number(value: &TemplateValue) -> Option<f64> {
    match value {
        TemplateValue::Number(n) => Some(*n),
        TemplateValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn compare(op: BinaryOp, left: &TemplateValue, right: &TemplateValue) -> bool {
    let ordering = match (as_number(left), as_number(right)) {
        (Some(l), Some(r)) => l.partial_cmp(&r),
        _ => match (left, right) {
            (TemplateValue::Null, TemplateValue::Null) => Some(Ordering::Equal),
            (TemplateValue::Null, _) | (_, TemplateValue::Null) => None,
            (TemplateValue::Bool(l), TemplateValue::Bool(r)) => Some(l.cmp(r)),
            _ => Some(left.render().cmp(&right.render())),
        },
    };
    match op {
        BinaryOp::Eq => ordering == Some(Ordering::Equal),
        BinaryOp::NotEq => ordering != Some(Ordering::Equal),
        BinaryOp::Lt => ordering == Some(Ordering::Less),
        BinaryOp::LtEq => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        BinaryOp::Gt => ordering == Some(Ordering::Greater),
        BinaryOp::GtEq => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        BinaryOp::And | BinaryOp::Or => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language_keys::PrefixedLanguageKeyGenerator;
    use crate::resolver::MemoryResolver;
    use narrative_error_reporting::DiagnosticKind;
    use pretty_assertions::assert_eq;

    fn npc_vars() -> TemplateContext {
        TemplateContext::new().with(
            "object",
            TemplateValue::map([
                ("id", "npc-1".into()),
                ("name", "Grom".into()),
                ("level", 3.into()),
                (
                    "inventory",
                    TemplateValue::List(vec![
                        TemplateValue::map([("name", "Axe".into()), ("quantity", 1.into())]),
                        TemplateValue::map([("name", "Bread".into()), ("quantity", 4.into())]),
                    ]),
                ),
            ]),
        )
    }

    async fn render_with_resolver(
        source: &str,
        vars: &TemplateContext,
        resolver: &MemoryResolver,
    ) -> (String, DiagnosticCollector) {
        let mut diagnostics = DiagnosticCollector::new();
        let output = {
            let mut ctx = EvalContext::new(&mut diagnostics, resolver);
            render_source(source, "Test", vars, &mut ctx).await
        };
        (output, diagnostics)
    }

    async fn render(source: &str, vars: &TemplateContext) -> (String, DiagnosticCollector) {
        render_with_resolver(source, vars, &MemoryResolver::new()).await
    }

    #[tokio::test]
    async fn test_literal_text() {
        let (output, diagnostics) = render("local x = 1\n", &TemplateContext::new()).await;
        assert_eq!(output, "local x = 1\n");
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_simple_variable() {
        let (output, diagnostics) = render("Hello {{ object.name }}", &npc_vars()).await;
        assert_eq!(output, "Hello Grom");
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_placeholder_warns() {
        let (output, diagnostics) = render("Hi {{ object.title }}!", &npc_vars()).await;
        assert_eq!(output, "Hi !");
        assert_eq!(
            diagnostics.summaries(),
            vec!["Unresolved Placeholder: placeholder `object.title` could not be resolved at Test(1,7)"]
        );
        assert_eq!(diagnostics.diagnostics()[0].kind, DiagnosticKind::Warning);
    }

    #[tokio::test]
    async fn test_default_pipe_suppresses_warning() {
        let (output, diagnostics) =
            render("{{ object.title | default \"Nobody\" }}", &npc_vars()).await;
        assert_eq!(output, "Nobody");
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_strict_mode_turns_warning_into_error() {
        let mut diagnostics = DiagnosticCollector::new();
        let resolver = MemoryResolver::new();
        {
            let mut ctx = EvalContext::new(&mut diagnostics, &resolver).with_strict_mode(true);
            render_source("{{ missing }}", "Test", &TemplateContext::new(), &mut ctx).await;
        }
        assert!(diagnostics.has_errors());
    }

    #[tokio::test]
    async fn test_conditions_and_comparisons() {
        let source = "{{ if object.level >= 3 && object.name == \"Grom\" }}boss{{ else }}minion{{ end }}";
        assert_eq!(render(source, &npc_vars()).await.0, "boss");

        let source = "{{ if object.level < 3 }}a{{ else if not object.title }}b{{ end }}";
        let (output, diagnostics) = render(source, &npc_vars()).await;
        assert_eq!(output, "b");
        assert!(diagnostics.is_empty(), "conditions never warn");
    }

    #[tokio::test]
    async fn test_numeric_string_comparison() {
        let vars = TemplateContext::new().with("value", "10".into());
        assert_eq!(render("{{ if value > 9 }}yes{{ end }}", &vars).await.0, "yes");
    }

    #[tokio::test]
    async fn test_for_loop_with_loop_state() {
        let source = "{{ for item in object.inventory }}{{ if not loop.first }}, {{ end }}{{ loop.index }}:{{ item.name }}{{ end }}";
        assert_eq!(render(source, &npc_vars()).await.0, "0:Axe, 1:Bread");
    }

    #[tokio::test]
    async fn test_for_loop_over_unresolved_warns() {
        let (output, diagnostics) = render("{{ for s in dialog.steps }}x{{ end }}", &npc_vars()).await;
        assert_eq!(output, "");
        assert_eq!(diagnostics.count_code(codes::UNRESOLVED_PLACEHOLDER), 1);
    }

    #[tokio::test]
    async fn test_index_access() {
        let source = "{{ object.inventory[1].name }} {{ object[\"name\"] }}";
        assert_eq!(render(source, &npc_vars()).await.0, "Bread Grom");
    }

    #[tokio::test]
    async fn test_pipes_chain() {
        let source = "{{ object.name | downcase | capitalize }} {{ object.inventory | size }}";
        assert_eq!(render(source, &npc_vars()).await.0, "Grom 2");
    }

    #[tokio::test]
    async fn test_include_sees_variables() {
        let resolver = MemoryResolver::with_includes([("Greeting", "Hello {{ object.name }}\n")]);
        let (output, diagnostics) =
            render_with_resolver("{{ include \"Greeting\" }}!", &npc_vars(), &resolver).await;
        assert_eq!(output, "Hello Grom!");
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_missing_include_reported_once_per_name() {
        let source = "{{ include \"Nope\" }}|{{ include \"Nope\" }}";
        let (output, diagnostics) = render(source, &TemplateContext::new()).await;
        assert_eq!(
            output,
            format!("{}|{}", INCLUDE_NOT_FOUND_SENTINEL, INCLUDE_NOT_FOUND_SENTINEL)
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.count_code(codes::MISSING_INCLUDE), 1);
    }

    #[tokio::test]
    async fn test_recursive_include_is_bounded() {
        let resolver = MemoryResolver::with_includes([
            ("A", "a{{ include \"B\" }}{{ include \"B\" }}"),
            ("B", "b{{ include \"A\" }}"),
        ]);
        let (output, diagnostics) =
            render_with_resolver("{{ include \"A\" }}", &TemplateContext::new(), &resolver).await;
        assert_eq!(diagnostics.count_code(codes::RECURSIVE_INCLUDE), 1);
        assert!(output.starts_with("abab"));
    }

    #[tokio::test]
    async fn test_invalid_include_renders_empty_with_include_name() {
        let resolver = MemoryResolver::with_includes([("Broken", "{{ if }}")]);
        let (output, diagnostics) =
            render_with_resolver("[{{ include \"Broken\" }}]", &TemplateContext::new(), &resolver)
                .await;
        assert_eq!(output, "[]");
        assert_eq!(
            diagnostics.summaries(),
            vec!["Template Syntax Error: expected an expression after `if` at Broken(1,7)"]
        );
    }

    #[tokio::test]
    async fn test_langkey_records_key() {
        let generator = PrefixedLanguageKeyGenerator::new("L");
        let mut diagnostics = DiagnosticCollector::new();
        let resolver = MemoryResolver::new();
        let mut ctx = EvalContext::new(&mut diagnostics, &resolver).with_language_key_generator(&generator);
        let output = render_source(
            "say({{ object.name | langkey }})",
            "Test",
            &npc_vars(),
            &mut ctx,
        )
        .await;
        assert_eq!(output, "say(L_npc_1_name)");
        let keys = ctx.into_language_keys();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].value, "Grom");
    }

    #[tokio::test]
    async fn test_langkey_without_generator_outputs_value() {
        let (output, diagnostics) = render("{{ object.name | langkey }}", &npc_vars()).await;
        assert_eq!(output, "Grom");
        assert_eq!(diagnostics.count_code(codes::LANGUAGE_KEYS_UNAVAILABLE), 1);
        assert!(!diagnostics.has_errors());
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let source = "{{ object.title }}{{ include \"X\" }}{{ for i in object.inventory }}{{ i.name }}{{ end }}";
        let first = render(source, &npc_vars()).await;
        let second = render(source, &npc_vars()).await;
        assert_eq!(first.0, second.0);
        assert_eq!(first.1.summaries(), second.1.summaries());
    }
}
