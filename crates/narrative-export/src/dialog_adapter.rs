/*
 * dialog_adapter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Mapping of dialogs to template values.
//!
//! Every step becomes a script function named by [`step_function_name`].
//! Conditions and actions of a step are rendered up front, so the dialog
//! template only arranges ready-made code.

use crate::codes;
use crate::conditions::{NodeRenderer, StepScope};
use crate::model::{ExportDialog, ExportDialogStep, FlexFieldObject, StepContent};
use narrative_template::{DiagnosticCollector, EvalContext, TemplateValue, ValueMap};
use std::collections::HashMap;

/// Script function name of a step: `Step_` followed by the id with every
/// character that is not an ASCII letter, digit or `_` replaced by `_`.
///
/// ```
/// use narrative_export::dialog_adapter::step_function_name;
///
/// assert_eq!(step_function_name("a1-b2"), "Step_a1_b2");
/// ```
pub fn step_function_name(step_id: &str) -> String {
    let sanitized: String = step_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("Step_{}", sanitized)
}

/// Predecessors of every step, in declaration order.
///
/// Links to steps that don't exist are reported once here.
fn compute_parents<'d>(
    dialog: &'d ExportDialog,
    errors: &mut DiagnosticCollector,
) -> HashMap<&'d str, Vec<&'d str>> {
    let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
    for step in &dialog.steps {
        for target in step.successor_ids() {
            if dialog.step(target).is_none() {
                errors.warn_with_code(
                    codes::BROKEN_DIALOG_LINK,
                    format!(
                        "step `{}` of dialog `{}` links to missing step `{}`",
                        step.id, dialog.id, target
                    ),
                    None,
                );
                continue;
            }
            let entry = parents.entry(target).or_default();
            if !entry.contains(&step.id.as_str()) {
                entry.push(step.id.as_str());
            }
        }
    }
    parents
}

/// Record steps whose ids map to the same function name.
fn check_function_names(dialog: &ExportDialog, errors: &mut DiagnosticCollector) {
    let mut owners: HashMap<String, &str> = HashMap::new();
    for step in &dialog.steps {
        let name = step_function_name(&step.id);
        match owners.get(&name) {
            Some(owner) if *owner != step.id => errors.error_with_code(
                codes::BROKEN_DIALOG_LINK,
                format!(
                    "steps `{}` and `{}` of dialog `{}` both become function `{}`",
                    owner, step.id, dialog.id, name
                ),
                None,
            ),
            Some(_) => {}
            None => {
                owners.insert(name, step.id.as_str());
            }
        }
    }
}

fn step_ref(id: &str) -> TemplateValue {
    TemplateValue::map([
        ("id", id.into()),
        ("function_name", step_function_name(id).into()),
    ])
}

struct StepMapper<'d, 'n, 'a> {
    dialog: &'d ExportDialog,
    flex_object: Option<&'d FlexFieldObject>,
    nodes: &'n mut NodeRenderer<'a>,
}

impl<'d> StepMapper<'d, '_, '_> {
    /// Target id when the step exists.
    fn link(&self, target: Option<&'d str>) -> Option<&'d str> {
        target.filter(|id| self.dialog.step(id).is_some())
    }

    fn function_or_null(&self, target: Option<&'d str>) -> TemplateValue {
        match self.link(target) {
            Some(id) => step_function_name(id).into(),
            None => TemplateValue::Null,
        }
    }

    async fn step_value(
        &mut self,
        step: &'d ExportDialogStep,
        parents: &[&str],
        ctx: &mut EvalContext<'_>,
    ) -> TemplateValue {
        let mut members = ValueMap::new();
        members.insert("id".into(), step.id.as_str().into());
        members.insert("function_name".into(), step_function_name(&step.id).into());
        members.insert("type".into(), step.content.type_name().into());

        let mut text = TemplateValue::Null;
        let mut choices = Vec::new();
        let mut branches = Vec::new();
        let mut else_function = TemplateValue::Null;
        let mut action = TemplateValue::Null;
        let mut next = self.link(step.next_step_id.as_deref());

        match &step.content {
            StepContent::NpcText { text: t } | StepContent::PlayerText { text: t } => {
                text = t.as_str().into();
            }
            StepContent::Choice { choices: step_choices } => {
                next = None;
                for choice in step_choices {
                    let target = self.link(choice.next_step_id.as_deref());
                    let condition = match &choice.condition {
                        Some(condition) => {
                            let scope = StepScope::step(&step.id, target, self.flex_object);
                            self.nodes.render_condition(condition, &scope, ctx).await
                        }
                        None => self.nodes.dialect().true_literal.to_string(),
                    };
                    let next_function = match target {
                        Some(id) => step_function_name(id),
                        None => self.nodes.dialect().null_literal.to_string(),
                    };
                    choices.push(TemplateValue::map([
                        ("id", choice.id.as_str().into()),
                        ("text", choice.text.as_str().into()),
                        ("condition", condition.into()),
                        ("next_function", next_function.into()),
                    ]));
                }
            }
            StepContent::Condition {
                branches: step_branches,
                else_next_step_id,
            } => {
                next = None;
                for branch in step_branches {
                    let target = self.link(branch.next_step_id.as_deref());
                    let scope = StepScope::step(&step.id, target, self.flex_object);
                    let condition = self.nodes.render_condition(&branch.condition, &scope, ctx).await;
                    branches.push(TemplateValue::map([
                        ("id", branch.id.as_str().into()),
                        ("condition", condition.into()),
                        ("next_function", self.function_or_null(target)),
                    ]));
                }
                else_function = self.function_or_null(else_next_step_id.as_deref());
            }
            StepContent::Action { action: node } => {
                let scope = StepScope::step(&step.id, next, self.flex_object);
                action = self.nodes.render_action(node, &scope, ctx).await.into();
            }
            StepContent::Reference { reference_step_id } => {
                next = self.link(Some(reference_step_id.as_str()));
            }
        }

        members.insert("text".into(), text);
        members.insert("choices".into(), choices.into());
        members.insert("branches".into(), branches.into());
        members.insert("else_function".into(), else_function);
        members.insert("action".into(), action);
        members.insert("next_function".into(), self.function_or_null(next));
        members.insert(
            "parents".into(),
            parents.iter().map(|id| step_ref(id)).collect::<Vec<_>>().into(),
        );
        TemplateValue::Map(members)
    }
}

/// The template value of a dialog, without its rendered `code`.
///
/// The entry function belongs to the first step no other step links to,
/// or to the first step when every step has a predecessor.
pub async fn dialog_value(
    dialog: &ExportDialog,
    flex_object: Option<&FlexFieldObject>,
    nodes: &mut NodeRenderer<'_>,
    ctx: &mut EvalContext<'_>,
) -> TemplateValue {
    let parents = compute_parents(dialog, &mut *ctx.diagnostics);
    check_function_names(dialog, &mut *ctx.diagnostics);
    let mut mapper = StepMapper {
        dialog,
        flex_object,
        nodes,
    };

    let mut steps = Vec::with_capacity(dialog.steps.len());
    for step in &dialog.steps {
        let step_parents = parents.get(step.id.as_str()).map(Vec::as_slice).unwrap_or_default();
        steps.push(mapper.step_value(step, step_parents, ctx).await);
    }

    let entry = dialog
        .steps
        .iter()
        .find(|step| !parents.contains_key(step.id.as_str()))
        .or_else(|| dialog.steps.first());

    TemplateValue::map([
        ("id", dialog.id.as_str().into()),
        ("steps", steps.into()),
        (
            "entry_function",
            entry.map(|step| step_function_name(&step.id)).into(),
        ),
    ])
}
