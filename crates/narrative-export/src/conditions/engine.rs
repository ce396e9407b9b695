/*
 * engine.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rendering of condition and action nodes.
//!
//! Every node kind except groups renders through its own snippet template,
//! fetched from the [`TemplateStore`] by [`TemplateType`]. Kinds with a
//! value object expose it to the template under [`SnippetNode::value_object_key`];
//! the others take the fast path of [`SnippetNode::replace_base_placeholders`],
//! a plain textual substitution without parsing.
//!
//! A node that fails to render records a diagnostic and yields empty text.
//! Its siblings render normally.

use crate::adapter::{get_field_name, get_flex_field, script_literal};
use crate::codes;
use crate::conditions::dialect::ScriptDialect;
use crate::dialog_adapter::step_function_name;
use crate::model::conditions::{
    game_time_operator, group_operator, inventory_operator, npc_alive_state, quest_state,
    routine_event_state, transfer_direction, value_change_operator, wait_unit,
};
use crate::model::GameTime;
use crate::model::{ActionNode, ConditionNode, ExportTemplate, FlexFieldObject, FlexFieldType, TemplateType};
use crate::renderer::render_code;
use crate::store::TemplateStore;
use narrative_template::evaluator::BoxFuture;
use narrative_template::{
    DiagnosticCollector, EvalContext, TemplateContext, TemplateValue, fill_legacy_placeholders,
    remove_final_newline,
};
use std::collections::HashMap;

/// Where in a dialog a node is rendered, and for which object.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepScope<'a> {
    pub cur_step: Option<&'a str>,
    pub next_step: Option<&'a str>,
    pub flex_object: Option<&'a FlexFieldObject>,
}

impl<'a> StepScope<'a> {
    /// Scope outside of any dialog.
    pub fn object(flex_object: &'a FlexFieldObject) -> Self {
        Self {
            cur_step: None,
            next_step: None,
            flex_object: Some(flex_object),
        }
    }

    pub fn step(
        cur_step: &'a str,
        next_step: Option<&'a str>,
        flex_object: Option<&'a FlexFieldObject>,
    ) -> Self {
        Self {
            cur_step: Some(cur_step),
            next_step,
            flex_object,
        }
    }

    /// `cur_step` and `next_step` as template variables.
    pub fn step_vars(&self) -> TemplateContext {
        TemplateContext::new()
            .with("cur_step", step_value(self.cur_step))
            .with("next_step", step_value(self.next_step))
    }

    fn object_id(&self) -> &str {
        self.flex_object.map(|o| o.id.as_str()).unwrap_or_default()
    }
}

fn step_value(id: Option<&str>) -> TemplateValue {
    match id {
        Some(id) => TemplateValue::map([
            ("id", id.into()),
            ("function_name", step_function_name(id).into()),
        ]),
        None => TemplateValue::Null,
    }
}

/// Operations every condition and action kind dispatches on.
pub trait SnippetNode {
    /// Whether the kind renders its template with a value object.
    fn uses_value_object(&self) -> bool;

    /// Variable name of the value object in the snippet template.
    fn value_object_key(&self) -> &'static str;

    /// Build the value object, or record why it can't be built.
    fn value_object(
        &self,
        scope: &StepScope<'_>,
        dialect: &ScriptDialect,
        errors: &mut DiagnosticCollector,
    ) -> Option<TemplateValue>;

    /// Snippet template rendering this kind. `None` for groups.
    fn template_type(&self) -> Option<TemplateType>;

    /// Variables of the fast path, or `None` after recording a problem.
    fn base_placeholders(
        &self,
        scope: &StepScope<'_>,
        errors: &mut DiagnosticCollector,
    ) -> Option<TemplateContext>;

    /// Fill `code` textually from [`SnippetNode::base_placeholders`].
    fn replace_base_placeholders(
        &self,
        code: &str,
        name: &str,
        scope: &StepScope<'_>,
        ctx: &mut EvalContext<'_>,
    ) -> String {
        match self.base_placeholders(scope, &mut *ctx.diagnostics) {
            Some(vars) => fill_legacy_placeholders(code, name, &vars, ctx),
            None => String::new(),
        }
    }
}

fn out_of_range(errors: &mut DiagnosticCollector, time: GameTime, node: &str) {
    errors.error_with_code(
        codes::UNSUPPORTED_CODE,
        format!("game time `{}:{:02}` is out of range in {}", time.hours, time.minutes, node),
        None,
    );
}

fn unsupported(errors: &mut DiagnosticCollector, what: &str, code: u8, node: &str) {
    errors.error_with_code(
        codes::UNSUPPORTED_CODE,
        format!("unknown {} code `{}` in {}", what, code, node),
        None,
    );
}

/// Canonical field name and whether the field is numeric.
///
/// A field id missing from the object is reported and the name stored on
/// the node is used instead.
fn resolve_field(
    scope: &StepScope<'_>,
    field_id: &str,
    field_name: &str,
    value: &str,
    errors: &mut DiagnosticCollector,
) -> (String, bool) {
    match scope.flex_object.and_then(|o| get_flex_field(o, field_id)) {
        Some(field) => (
            get_field_name(field, field_name, errors),
            field.field_type == FlexFieldType::Number,
        ),
        None => {
            errors.warn_with_code(
                codes::FIELD_NOT_FOUND_DEFAULT_USED,
                format!(
                    "field `{}` does not exist on `{}`, using `{}`",
                    field_id,
                    scope.flex_object.map(|o| o.name.as_str()).unwrap_or_default(),
                    field_name
                ),
                None,
            );
            (field_name.to_string(), value.trim().parse::<f64>().is_ok())
        }
    }
}

fn quest_state_name(state: u8) -> Option<&'static str> {
    match state {
        quest_state::NOT_STARTED => Some("NotStarted"),
        quest_state::IN_PROGRESS => Some("InProgress"),
        quest_state::SUCCESS => Some("Success"),
        quest_state::FAILED => Some("Failed"),
        _ => None,
    }
}

fn routine_state(state: u8) -> Option<bool> {
    match state {
        routine_event_state::ENABLED => Some(true),
        routine_event_state::DISABLED => Some(false),
        _ => None,
    }
}

fn negation(dialect: &ScriptDialect, negate: bool) -> TemplateValue {
    if negate { dialect.not.into() } else { "".into() }
}

impl SnippetNode for ConditionNode {
    fn uses_value_object(&self) -> bool {
        !matches!(self, ConditionNode::Group { .. } | ConditionNode::Code { .. })
    }

    fn value_object_key(&self) -> &'static str {
        match self {
            ConditionNode::Group { .. } => "conditions",
            ConditionNode::ValueField { .. } => "value_field",
            ConditionNode::QuestState { .. } => "quest_state",
            ConditionNode::Inventory { .. } => "inventory",
            ConditionNode::GameTime { .. } => "game_time",
            ConditionNode::RandomValue { .. } => "random_value",
            ConditionNode::DailyRoutineEventState { .. } => "routine_event",
            ConditionNode::NpcAliveState { .. } => "npc_alive",
            ConditionNode::Code { .. } => "code",
        }
    }

    fn value_object(
        &self,
        scope: &StepScope<'_>,
        dialect: &ScriptDialect,
        errors: &mut DiagnosticCollector,
    ) -> Option<TemplateValue> {
        match self {
            ConditionNode::Group { .. } | ConditionNode::Code { .. } => None,
            ConditionNode::ValueField {
                field_id,
                field_name,
                operator,
                compare_value,
            } => {
                let Some(comparison) = dialect.compare(*operator) else {
                    unsupported(errors, "compare operator", *operator, "value field condition");
                    return None;
                };
                let (name, is_number) = resolve_field(scope, field_id, field_name, compare_value, errors);
                Some(TemplateValue::map([
                    ("object_id", scope.object_id().into()),
                    ("field_id", field_id.into()),
                    ("field_name", name.into()),
                    ("operator", comparison.into()),
                    ("compare_value", script_literal(compare_value, is_number).into()),
                ]))
            }
            ConditionNode::QuestState { quest_id, state } => {
                let Some(state_name) = quest_state_name(*state) else {
                    unsupported(errors, "quest state", *state, "quest state condition");
                    return None;
                };
                Some(TemplateValue::map([
                    ("quest_id", quest_id.into()),
                    ("state", state_name.into()),
                ]))
            }
            ConditionNode::Inventory {
                item_id,
                quantity,
                operator,
            } => {
                let (name, comparison) = match *operator {
                    inventory_operator::AT_LEAST => ("at_least", Some(dialect.greater_or_equal)),
                    inventory_operator::AT_MAXIMUM => ("at_maximum", Some(dialect.less_or_equal)),
                    inventory_operator::HAS_EQUIPPED => ("has_equipped", None),
                    inventory_operator::HAS_NOT_EQUIPPED => ("has_not_equipped", None),
                    other => {
                        unsupported(errors, "inventory operator", other, "inventory condition");
                        return None;
                    }
                };
                Some(TemplateValue::map([
                    ("item_id", item_id.into()),
                    ("quantity", (*quantity).into()),
                    ("operator", name.into()),
                    ("comparison", comparison.into()),
                    ("is_equipment_check", comparison.is_none().into()),
                    (
                        "negation",
                        negation(dialect, *operator == inventory_operator::HAS_NOT_EQUIPPED),
                    ),
                ]))
            }
            ConditionNode::GameTime {
                hours,
                minutes,
                operator,
            } => {
                let (name, comparison) = match *operator {
                    game_time_operator::BEFORE => ("before", dialect.less),
                    game_time_operator::AFTER => ("after", dialect.greater),
                    other => {
                        unsupported(errors, "game time operator", other, "game time condition");
                        return None;
                    }
                };
                let time = GameTime::new(*hours, *minutes);
                let Some(total_minutes) = time.total_minutes() else {
                    out_of_range(errors, time, "game time condition");
                    return None;
                };
                Some(TemplateValue::map([
                    ("hours", (*hours).into()),
                    ("minutes", (*minutes).into()),
                    ("total_minutes", total_minutes.into()),
                    ("operator", name.into()),
                    ("comparison", comparison.into()),
                ]))
            }
            ConditionNode::RandomValue {
                min,
                max,
                operator,
                compare_value,
            } => {
                let Some(comparison) = dialect.compare(*operator) else {
                    unsupported(errors, "compare operator", *operator, "random value condition");
                    return None;
                };
                Some(TemplateValue::map([
                    ("min", (*min).into()),
                    ("max", (*max).into()),
                    ("operator", comparison.into()),
                    ("compare_value", (*compare_value).into()),
                ]))
            }
            ConditionNode::DailyRoutineEventState {
                npc_id,
                event_id,
                state,
            } => {
                let Some(enabled) = routine_state(*state) else {
                    unsupported(errors, "routine event state", *state, "daily routine condition");
                    return None;
                };
                Some(TemplateValue::map([
                    ("npc_id", npc_id.into()),
                    ("event_id", event_id.into()),
                    ("state", (if enabled { "enabled" } else { "disabled" }).into()),
                    ("is_enabled", enabled.into()),
                    ("negation", negation(dialect, !enabled)),
                ]))
            }
            ConditionNode::NpcAliveState { npc_id, state } => {
                let alive = match *state {
                    npc_alive_state::ALIVE => true,
                    npc_alive_state::DEAD => false,
                    other => {
                        unsupported(errors, "npc alive state", other, "npc alive condition");
                        return None;
                    }
                };
                Some(TemplateValue::map([
                    ("npc_id", npc_id.into()),
                    ("state", (if alive { "alive" } else { "dead" }).into()),
                    ("negation", negation(dialect, !alive)),
                ]))
            }
        }
    }

    fn template_type(&self) -> Option<TemplateType> {
        match self {
            ConditionNode::Group { .. } => None,
            ConditionNode::ValueField { .. } => Some(TemplateType::ConditionValueField),
            ConditionNode::QuestState { .. } => Some(TemplateType::ConditionQuestState),
            ConditionNode::Inventory { .. } => Some(TemplateType::ConditionInventory),
            ConditionNode::GameTime { .. } => Some(TemplateType::ConditionGameTime),
            ConditionNode::RandomValue { .. } => Some(TemplateType::ConditionRandomValue),
            ConditionNode::DailyRoutineEventState { .. } => {
                Some(TemplateType::ConditionDailyRoutineEventState)
            }
            ConditionNode::NpcAliveState { .. } => Some(TemplateType::ConditionNpcAliveState),
            ConditionNode::Code { .. } => Some(TemplateType::ConditionCode),
        }
    }

    fn base_placeholders(
        &self,
        scope: &StepScope<'_>,
        _errors: &mut DiagnosticCollector,
    ) -> Option<TemplateContext> {
        match self {
            ConditionNode::Code { code } => Some(scope.step_vars().with("code", code.into())),
            _ => None,
        }
    }
}

impl SnippetNode for ActionNode {
    fn uses_value_object(&self) -> bool {
        !matches!(self, ActionNode::Wait { .. } | ActionNode::Code { .. })
    }

    fn value_object_key(&self) -> &'static str {
        match self {
            ActionNode::ChangeValueField { .. } => "change_value",
            ActionNode::SetQuestState { .. } => "quest_state",
            ActionNode::TransferItem { .. } => "transfer_item",
            ActionNode::SetDailyRoutineEventState { .. } => "routine_event",
            ActionNode::Wait { .. } => "wait",
            ActionNode::Code { .. } => "code",
        }
    }

    fn value_object(
        &self,
        scope: &StepScope<'_>,
        dialect: &ScriptDialect,
        errors: &mut DiagnosticCollector,
    ) -> Option<TemplateValue> {
        match self {
            ActionNode::Wait { .. } | ActionNode::Code { .. } => None,
            ActionNode::ChangeValueField {
                field_id,
                field_name,
                operator,
                value,
            } => {
                let operator_name = match *operator {
                    value_change_operator::SET => "set",
                    value_change_operator::ADD => "add",
                    value_change_operator::SUBTRACT => "subtract",
                    other => {
                        unsupported(errors, "value change operator", other, "change value action");
                        return None;
                    }
                };
                let (name, is_number) = resolve_field(scope, field_id, field_name, value, errors);
                Some(TemplateValue::map([
                    ("object_id", scope.object_id().into()),
                    ("field_id", field_id.into()),
                    ("field_name", name.into()),
                    ("operator", operator_name.into()),
                    ("value", script_literal(value, is_number).into()),
                ]))
            }
            ActionNode::SetQuestState { quest_id, state } => {
                let Some(state_name) = quest_state_name(*state) else {
                    unsupported(errors, "quest state", *state, "set quest state action");
                    return None;
                };
                Some(TemplateValue::map([
                    ("quest_id", quest_id.into()),
                    ("state", state_name.into()),
                ]))
            }
            ActionNode::TransferItem {
                item_id,
                quantity,
                direction,
            } => {
                let direction_name = match *direction {
                    transfer_direction::TO_PLAYER => "to_player",
                    transfer_direction::TO_NPC => "to_npc",
                    other => {
                        unsupported(errors, "transfer direction", other, "transfer item action");
                        return None;
                    }
                };
                Some(TemplateValue::map([
                    ("item_id", item_id.into()),
                    ("quantity", (*quantity).into()),
                    ("direction", direction_name.into()),
                ]))
            }
            ActionNode::SetDailyRoutineEventState {
                npc_id,
                event_id,
                state,
            } => {
                let Some(enabled) = routine_state(*state) else {
                    unsupported(errors, "routine event state", *state, "daily routine action");
                    return None;
                };
                Some(TemplateValue::map([
                    ("npc_id", npc_id.into()),
                    ("event_id", event_id.into()),
                    ("state", (if enabled { "enabled" } else { "disabled" }).into()),
                    ("is_enabled", enabled.into()),
                    ("enabled_literal", dialect.bool_literal(enabled).into()),
                ]))
            }
        }
    }

    fn template_type(&self) -> Option<TemplateType> {
        Some(match self {
            ActionNode::ChangeValueField { .. } => TemplateType::ActionChangeValueField,
            ActionNode::SetQuestState { .. } => TemplateType::ActionSetQuestState,
            ActionNode::TransferItem { .. } => TemplateType::ActionTransferItem,
            ActionNode::SetDailyRoutineEventState { .. } => {
                TemplateType::ActionSetDailyRoutineEventState
            }
            ActionNode::Wait { .. } => TemplateType::ActionWait,
            ActionNode::Code { .. } => TemplateType::ActionCode,
        })
    }

    fn base_placeholders(
        &self,
        scope: &StepScope<'_>,
        errors: &mut DiagnosticCollector,
    ) -> Option<TemplateContext> {
        match self {
            ActionNode::Code { code } => Some(scope.step_vars().with("code", code.into())),
            ActionNode::Wait { amount, unit } => {
                let unit_name = match *unit {
                    wait_unit::SECONDS => "seconds",
                    wait_unit::MINUTES => "minutes",
                    wait_unit::HOURS => "hours",
                    wait_unit::DAYS => "days",
                    other => {
                        unsupported(errors, "wait unit", other, "wait action");
                        return None;
                    }
                };
                Some(
                    scope
                        .step_vars()
                        .with("amount", (*amount).into())
                        .with("unit", unit_name.into()),
                )
            }
            _ => None,
        }
    }
}

/// Renders condition and action trees of one project.
///
/// Snippet templates are fetched once per renderer.
pub struct NodeRenderer<'a> {
    templates: &'a dyn TemplateStore,
    project_id: &'a str,
    dialect: ScriptDialect,
    cache: HashMap<TemplateType, Result<ExportTemplate, String>>,
}

impl<'a> NodeRenderer<'a> {
    pub fn new(templates: &'a dyn TemplateStore, project_id: &'a str, dialect: ScriptDialect) -> Self {
        Self {
            templates,
            project_id,
            dialect,
            cache: HashMap::new(),
        }
    }

    pub fn dialect(&self) -> &ScriptDialect {
        &self.dialect
    }

    /// Fetch the project's template for `template_type`.
    ///
    /// A failed fetch records a missing template diagnostic on every call.
    pub async fn template(
        &mut self,
        template_type: TemplateType,
        ctx: &mut EvalContext<'_>,
    ) -> Option<ExportTemplate> {
        if !self.cache.contains_key(&template_type) {
            let fetched = self
                .templates
                .get_default_template_by_type(self.project_id, template_type)
                .await
                .map_err(|err| err.to_string());
            self.cache.insert(template_type, fetched);
        }
        match self.cache.get(&template_type) {
            Some(Ok(template)) => Some(template.clone()),
            Some(Err(message)) => {
                ctx.diagnostics.error_with_code(
                    codes::MISSING_EXPORT_TEMPLATE,
                    message.clone(),
                    None,
                );
                None
            }
            None => None,
        }
    }

    /// Render a condition tree to script code.
    ///
    /// A node that cannot be rendered becomes the dialect's `false` literal,
    /// so groups keep one operand per listed child and the result is never
    /// empty. An empty group renders the identity of its operator: `true`
    /// for `and`, `false` for `or`.
    pub fn render_condition<'s, 'r: 's>(
        &'s mut self,
        node: &'s ConditionNode,
        scope: &'s StepScope<'_>,
        ctx: &'s mut EvalContext<'r>,
    ) -> BoxFuture<'s, String> {
        Box::pin(async move {
            let ConditionNode::Group {
                operator,
                conditions,
            } = node
            else {
                let code = self.render_snippet(node, scope, ctx).await;
                if code.trim().is_empty() {
                    return self.dialect.false_literal.to_string();
                }
                return code;
            };

            if self.dialect.group_join(*operator).is_none() {
                unsupported(&mut *ctx.diagnostics, "group operator", *operator, "condition group");
                return self.dialect.false_literal.to_string();
            }
            if conditions.is_empty() {
                let identity = *operator == group_operator::AND;
                return self.dialect.bool_literal(identity).to_string();
            }

            let mut parts = Vec::with_capacity(conditions.len());
            for child in conditions {
                parts.push(self.render_condition(child, scope, ctx).await);
            }
            self.dialect
                .group(*operator, &parts)
                .unwrap_or_else(|| self.dialect.false_literal.to_string())
        })
    }

    /// Render an action to script code.
    pub async fn render_action(
        &mut self,
        node: &ActionNode,
        scope: &StepScope<'_>,
        ctx: &mut EvalContext<'_>,
    ) -> String {
        self.render_snippet(node, scope, ctx).await
    }

    async fn render_snippet<N: SnippetNode + Sync>(
        &mut self,
        node: &N,
        scope: &StepScope<'_>,
        ctx: &mut EvalContext<'_>,
    ) -> String {
        let Some(template_type) = node.template_type() else {
            return String::new();
        };
        let Some(template) = self.template(template_type, ctx).await else {
            return String::new();
        };
        let code = remove_final_newline(&template.code);

        if !node.uses_value_object() {
            return node.replace_base_placeholders(code, template_type.name(), scope, ctx);
        }

        let Some(value) = node.value_object(scope, &self.dialect, &mut *ctx.diagnostics) else {
            return String::new();
        };
        let vars = scope
            .step_vars()
            .with(node.value_object_key(), value);
        render_code(code, template_type.name(), template.rendering_engine, &vars, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::conditions::compare_operator;
    use crate::model::{FlexField, RenderingEngine};
    use crate::store::MemoryTemplateStore;
    use narrative_template::NullResolver;
    use pretty_assertions::assert_eq;

    fn code(code: &str) -> ConditionNode {
        ConditionNode::Code { code: code.into() }
    }

    async fn render(store: &MemoryTemplateStore, dialect: ScriptDialect, node: &ConditionNode) -> (String, DiagnosticCollector) {
        let mut diagnostics = DiagnosticCollector::new();
        let object = FlexFieldObject::new("npc-1", "Grom")
            .with_field(FlexField::new("f1", "Health", "10").with_type(FlexFieldType::Number).with_aliases("HP"));
        let output = {
            let mut ctx = EvalContext::new(&mut diagnostics, &NullResolver);
            let mut renderer = NodeRenderer::new(store, "p1", dialect);
            renderer
                .render_condition(node, &StepScope::object(&object), &mut ctx)
                .await
        };
        (output, diagnostics)
    }

    #[tokio::test]
    async fn test_and_group_per_dialect() {
        let store = MemoryTemplateStore::new();
        let group = ConditionNode::Group {
            operator: group_operator::AND,
            conditions: vec![code("a"), code("b")],
        };

        let (c_like, _) = render(&store, ScriptDialect::c_like(), &group).await;
        let (lua, diagnostics) = render(&store, ScriptDialect::lua(), &group).await;

        assert_eq!(c_like, "(a && b)");
        assert_eq!(lua, "(a and b)");
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_empty_group_renders_operator_identity() {
        let store = MemoryTemplateStore::new();
        let empty = |operator| ConditionNode::Group {
            operator,
            conditions: vec![],
        };

        let (all, diagnostics) = render(&store, ScriptDialect::lua(), &empty(group_operator::AND)).await;
        let (any, _) = render(&store, ScriptDialect::lua(), &empty(group_operator::OR)).await;

        assert_eq!(all, "true");
        assert_eq!(any, "false");
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_failed_child_keeps_group_arity() {
        let store = MemoryTemplateStore::new();
        let bad_quest = || ConditionNode::QuestState {
            quest_id: "q1".into(),
            state: 9,
        };
        let group = ConditionNode::Group {
            operator: group_operator::AND,
            conditions: vec![bad_quest(), code("IsNight()")],
        };

        let (output, diagnostics) = render(&store, ScriptDialect::lua(), &group).await;

        assert_eq!(output, "(false and IsNight())");
        assert_eq!(
            diagnostics.summaries(),
            vec!["Unsupported Condition Or Action Code: unknown quest state code `9` in quest state condition"]
        );
        assert_eq!(diagnostics.count_code(codes::UNSUPPORTED_CODE), 1);

        let only_bad = ConditionNode::Group {
            operator: group_operator::OR,
            conditions: vec![bad_quest()],
        };
        assert_eq!(render(&store, ScriptDialect::c_like(), &only_bad).await.0, "(false)");
    }

    #[tokio::test]
    async fn test_unknown_group_operator_is_false() {
        let store = MemoryTemplateStore::new();
        let group = ConditionNode::Group {
            operator: 7,
            conditions: vec![code("a")],
        };

        let (output, diagnostics) = render(&store, ScriptDialect::lua(), &group).await;

        assert_eq!(output, "false");
        assert_eq!(diagnostics.count_code(codes::UNSUPPORTED_CODE), 1);
    }

    #[tokio::test]
    async fn test_game_time_out_of_range() {
        let store = MemoryTemplateStore::new();
        let node = ConditionNode::GameTime {
            hours: u32::MAX,
            minutes: 0,
            operator: game_time_operator::BEFORE,
        };

        let (output, diagnostics) = render(&store, ScriptDialect::lua(), &node).await;

        assert_eq!(output, "false");
        assert_eq!(
            diagnostics.summaries(),
            vec!["Unsupported Condition Or Action Code: game time `4294967295:00` is out of range in game time condition"]
        );

        let evening = ConditionNode::GameTime {
            hours: 20,
            minutes: 0,
            operator: game_time_operator::AFTER,
        };
        assert_eq!(
            render(&store, ScriptDialect::lua(), &evening).await.0,
            "GetGameTimeMinutes() > 1200"
        );
    }

    #[tokio::test]
    async fn test_value_field_uses_canonical_name() {
        let store = MemoryTemplateStore::new();
        let node = ConditionNode::ValueField {
            field_id: "f1".into(),
            field_name: "hp".into(),
            operator: compare_operator::GREATER,
            compare_value: "5".into(),
        };

        let (output, diagnostics) = render(&store, ScriptDialect::lua(), &node).await;

        assert_eq!(output, "GetField(\"npc-1\", \"Health\") > 5");
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_missing_field_falls_back_to_stored_name() {
        let store = MemoryTemplateStore::new();
        let node = ConditionNode::ValueField {
            field_id: "gone".into(),
            field_name: "Mood".into(),
            operator: compare_operator::EQUAL,
            compare_value: "angry".into(),
        };

        let (output, diagnostics) = render(&store, ScriptDialect::c_like(), &node).await;

        assert_eq!(output, "GetField(\"npc-1\", \"Mood\") == \"angry\"");
        assert_eq!(diagnostics.count_code(codes::FIELD_NOT_FOUND_DEFAULT_USED), 1);
    }

    #[tokio::test]
    async fn test_missing_snippet_template() {
        let store = MemoryTemplateStore::without_defaults();
        let (output, diagnostics) = render(&store, ScriptDialect::lua(), &code("x")).await;

        assert_eq!(output, "false");
        assert_eq!(
            diagnostics.summaries(),
            vec!["Missing Export Template: no `condition_code` template in project `p1`"]
        );
    }

    #[tokio::test]
    async fn test_action_through_project_template() {
        let mut store = MemoryTemplateStore::new();
        store.add_template(
            ExportTemplate::new("p1", TemplateType::ActionWait, "sleep({{amount}}, '{{unit}}')\n")
                .with_rendering_engine(RenderingEngine::Legacy),
        );
        let mut diagnostics = DiagnosticCollector::new();
        let output = {
            let mut ctx = EvalContext::new(&mut diagnostics, &NullResolver);
            let mut renderer = NodeRenderer::new(&store, "p1", ScriptDialect::lua());
            renderer
                .render_action(
                    &ActionNode::Wait {
                        amount: 3,
                        unit: wait_unit::MINUTES,
                    },
                    &StepScope::default(),
                    &mut ctx,
                )
                .await
        };

        assert_eq!(output, "sleep(3, 'minutes')");
        assert!(diagnostics.is_empty());
    }
}
