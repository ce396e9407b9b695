/*
 * adapter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Mapping of domain objects to template values.
//!
//! Each exported type has an explicit mapping function producing the
//! [`TemplateValue`] tree a template sees under `object`. Flex fields are
//! reachable by canonical name and by every script alias.

use crate::codes;
use crate::conditions::{NodeRenderer, StepScope};
use crate::model::{
    DailyRoutineEvent, ExportObject, FlexField, FlexFieldObject, FlexFieldType, GameTime,
    InventoryEntry, Npc,
};
use narrative_template::{
    DiagnosticCollector, EvalContext, TemplateValue, ValueMap, escape_script_string,
};
use std::collections::HashMap;

/// The field with id `field_id`, if the object has one.
pub fn get_flex_field<'a>(object: &'a FlexFieldObject, field_id: &str) -> Option<&'a FlexField> {
    object.fields.iter().find(|field| field.id == field_id)
}

/// Resolve `searched_name` to the canonical name of `field`.
///
/// An exact match on the name or a case-insensitive match on one of the
/// script aliases resolves silently. Anything else records one warning.
/// The canonical name is returned in every case.
pub fn get_field_name(field: &FlexField, searched_name: &str, errors: &mut DiagnosticCollector) -> String {
    if field.name == searched_name {
        return field.name.clone();
    }
    let searched = searched_name.trim().to_lowercase();
    if field
        .script_settings
        .aliases()
        .any(|alias| alias.to_lowercase() == searched)
    {
        return field.name.clone();
    }

    errors.warn_with_code(
        codes::FIELD_NOT_FOUND_DEFAULT_USED,
        format!(
            "`{}` matches neither field `{}` nor its aliases, using `{}`",
            searched_name, field.name, field.name
        ),
        None,
    );
    field.name.clone()
}

/// `value` as a script literal: bare when numeric, quoted otherwise.
pub fn script_literal(value: &str, is_number: bool) -> String {
    let trimmed = value.trim();
    if is_number && trimmed.parse::<f64>().is_ok() {
        trimmed.to_string()
    } else {
        format!("\"{}\"", escape_script_string(value))
    }
}

fn field_value(field: &FlexField) -> TemplateValue {
    let is_number = field.field_type == FlexFieldType::Number;
    let value = match field.value.trim().parse::<f64>() {
        Ok(n) if is_number => TemplateValue::Number(n),
        _ => field.value.as_str().into(),
    };
    let aliases: Vec<TemplateValue> = field.script_settings.aliases().map(Into::into).collect();

    TemplateValue::map([
        ("id", field.id.as_str().into()),
        ("name", field.name.as_str().into()),
        ("value", value),
        ("type", field.field_type.name().into()),
        ("script_value", script_literal(&field.value, is_number).into()),
        ("aliases", aliases.into()),
    ])
}

/// Members shared by every flex field object.
///
/// `fields` is keyed by canonical name and every alias. When two fields
/// claim the same key the first one keeps it and a warning is recorded.
pub fn flex_object_members(object: &FlexFieldObject, errors: &mut DiagnosticCollector) -> ValueMap {
    let mut fields = ValueMap::new();
    let mut owners: HashMap<String, &str> = HashMap::new();

    for field in &object.fields {
        let value = field_value(field);
        let keys = std::iter::once(field.name.as_str()).chain(field.script_settings.aliases());
        for key in keys {
            match owners.get(key) {
                Some(owner) if *owner == field.name => {}
                Some(owner) => errors.warn_with_code(
                    codes::AMBIGUOUS_FIELD_ALIAS,
                    format!(
                        "`{}` is claimed by fields `{}` and `{}` of `{}`, using `{}`",
                        key, owner, field.name, object.name, owner
                    ),
                    None,
                ),
                None => {
                    owners.insert(key.to_string(), field.name.as_str());
                    fields.insert(key.to_string(), value.clone());
                }
            }
        }
    }

    let field_list: Vec<TemplateValue> = object.fields.iter().map(field_value).collect();
    let unused_fields: Vec<TemplateValue> = object
        .fields
        .iter()
        .filter(|field| field.script_settings.aliases().next().is_none())
        .map(field_value)
        .collect();

    let mut members = ValueMap::new();
    members.insert("id".into(), object.id.as_str().into());
    members.insert("name".into(), object.name.as_str().into());
    members.insert("fields".into(), TemplateValue::Map(fields));
    members.insert("field_list".into(), field_list.into());
    members.insert("unused_fields".into(), unused_fields.into());
    members
}

/// A time out of range keeps its parts but has no `total_minutes`.
fn time_value(time: GameTime, event_id: &str, errors: &mut DiagnosticCollector) -> TemplateValue {
    let total_minutes = time.total_minutes();
    if total_minutes.is_none() {
        errors.error_with_code(
            codes::UNSUPPORTED_CODE,
            format!(
                "game time `{}:{:02}` is out of range in daily routine event `{}`",
                time.hours, time.minutes, event_id
            ),
            None,
        );
    }
    TemplateValue::map([
        ("hours", time.hours.into()),
        ("minutes", time.minutes.into()),
        ("total_minutes", total_minutes.into()),
    ])
}

fn inventory_value(entry: &InventoryEntry) -> TemplateValue {
    TemplateValue::map([
        ("item_id", entry.item_id.as_str().into()),
        ("quantity", entry.quantity.into()),
        ("is_equipped", entry.is_equipped.into()),
    ])
}

async fn routine_event_value(
    event: &DailyRoutineEvent,
    base: &FlexFieldObject,
    nodes: &mut NodeRenderer<'_>,
    ctx: &mut EvalContext<'_>,
) -> TemplateValue {
    let script_code = match &event.script {
        Some(action) => nodes.render_action(action, &StepScope::object(base), ctx).await,
        None => String::new(),
    };
    let earliest_time = time_value(event.earliest_time, &event.event_id, &mut *ctx.diagnostics);
    let latest_time = time_value(event.latest_time, &event.event_id, &mut *ctx.diagnostics);
    TemplateValue::map([
        ("event_id", event.event_id.as_str().into()),
        ("earliest_time", earliest_time),
        ("latest_time", latest_time),
        ("movement_target", event.movement_target.as_deref().into()),
        ("enabled_by_default", event.enabled_by_default.into()),
        ("script_code", script_code.into()),
    ])
}

async fn npc_members(
    npc: &Npc,
    members: &mut ValueMap,
    nodes: &mut NodeRenderer<'_>,
    ctx: &mut EvalContext<'_>,
) {
    let mut routine = Vec::with_capacity(npc.daily_routine.len());
    for event in &npc.daily_routine {
        routine.push(routine_event_value(event, &npc.base, nodes, ctx).await);
    }
    let skills: Vec<TemplateValue> = npc.skills.iter().map(|s| s.as_str().into()).collect();

    members.insert("is_player_npc".into(), npc.is_player_npc.into());
    members.insert(
        "inventory".into(),
        npc.inventory.iter().map(inventory_value).collect::<Vec<_>>().into(),
    );
    members.insert("skills".into(), skills.into());
    members.insert("daily_routine".into(), routine.into());
}

/// The template value of an exported object.
pub async fn object_value(
    object: &ExportObject,
    nodes: &mut NodeRenderer<'_>,
    ctx: &mut EvalContext<'_>,
) -> TemplateValue {
    let mut members = flex_object_members(object.base(), &mut *ctx.diagnostics);
    match object {
        ExportObject::Npc(npc) => npc_members(npc, &mut members, nodes, ctx).await,
        ExportObject::Item(item) => {
            members.insert("value".into(), item.value.into());
        }
        ExportObject::Skill(_) => {}
    }
    TemplateValue::Map(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::ScriptDialect;
    use crate::model::ActionNode;
    use crate::model::conditions::quest_state;
    use crate::store::MemoryTemplateStore;
    use narrative_template::NullResolver;
    use pretty_assertions::assert_eq;

    fn health() -> FlexField {
        FlexField::new("f1", "Health", "10")
            .with_type(FlexFieldType::Number)
            .with_aliases("HP, Hit Points")
    }

    #[test]
    fn test_get_field_name_exact() {
        let mut errors = DiagnosticCollector::new();
        assert_eq!(get_field_name(&health(), "Health", &mut errors), "Health");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_get_field_name_alias_is_case_insensitive() {
        let mut errors = DiagnosticCollector::new();
        assert_eq!(get_field_name(&health(), "hit points", &mut errors), "Health");
        assert_eq!(get_field_name(&health(), "hp", &mut errors), "Health");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_get_field_name_fallback_records_one_warning() {
        let mut errors = DiagnosticCollector::new();
        assert_eq!(get_field_name(&health(), "Mana", &mut errors), "Health");
        assert_eq!(
            errors.summaries(),
            vec!["Field Not Found, Default Used: `Mana` matches neither field `Health` nor its aliases, using `Health`"]
        );
        assert!(!errors.has_errors());
    }

    #[test]
    fn test_get_flex_field() {
        let object = FlexFieldObject::new("npc-1", "Grom").with_field(health());
        assert_eq!(get_flex_field(&object, "f1").map(|f| f.name.as_str()), Some("Health"));
        assert!(get_flex_field(&object, "f2").is_none());
    }

    #[test]
    fn test_fields_by_alias_and_ambiguity() {
        let object = FlexFieldObject::new("npc-1", "Grom")
            .with_field(health())
            .with_field(FlexField::new("f2", "Hunger", "low").with_aliases("HP"))
            .with_field(FlexField::new("f3", "Title", "Chief"));
        let mut errors = DiagnosticCollector::new();

        let members = flex_object_members(&object, &mut errors);
        let fields = &members["fields"];

        assert_eq!(fields.get_path(&["HP", "name"]).map(|v| v.render()), Some("Health".into()));
        assert_eq!(fields.get_path(&["Hit Points", "value"]), Some(&TemplateValue::Number(10.0)));
        assert_eq!(
            fields.get_path(&["Title", "script_value"]).map(|v| v.render()),
            Some("\"Chief\"".into())
        );
        assert_eq!(errors.count_code(codes::AMBIGUOUS_FIELD_ALIAS), 1);

        let TemplateValue::List(unused) = &members["unused_fields"] else {
            panic!("unused_fields is not a list");
        };
        assert_eq!(unused.len(), 1);
    }

    #[tokio::test]
    async fn test_npc_routine_script_is_rendered() {
        let store = MemoryTemplateStore::new();
        let npc = Npc {
            base: FlexFieldObject::new("npc-1", "Grom"),
            daily_routine: vec![DailyRoutineEvent {
                event_id: "ev1".into(),
                earliest_time: GameTime::new(8, 0),
                latest_time: GameTime::new(9, 30),
                movement_target: Some("Market".into()),
                script: Some(ActionNode::SetQuestState {
                    quest_id: "q1".into(),
                    state: quest_state::IN_PROGRESS,
                }),
                enabled_by_default: true,
            }],
            ..Default::default()
        };

        let mut diagnostics = DiagnosticCollector::new();
        let value = {
            let mut ctx = EvalContext::new(&mut diagnostics, &NullResolver);
            let mut nodes = NodeRenderer::new(&store, "p1", ScriptDialect::lua());
            object_value(&ExportObject::Npc(npc), &mut nodes, &mut ctx).await
        };

        let event = value.get_path(&["daily_routine"]).and_then(|r| r.get_index(0)).unwrap();
        assert_eq!(
            event.get_field("script_code").map(|v| v.render()),
            Some("SetQuestState(\"q1\", QuestState.InProgress)".into())
        );
        assert_eq!(
            event.get_path(&["latest_time", "total_minutes"]),
            Some(&TemplateValue::Number(570.0))
        );
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_routine_time_out_of_range() {
        let store = MemoryTemplateStore::new();
        let npc = Npc {
            base: FlexFieldObject::new("npc-1", "Grom"),
            daily_routine: vec![DailyRoutineEvent {
                event_id: "ev1".into(),
                earliest_time: GameTime::new(8, 0),
                latest_time: GameTime::new(u32::MAX, 75),
                movement_target: None,
                script: None,
                enabled_by_default: true,
            }],
            ..Default::default()
        };

        let mut diagnostics = DiagnosticCollector::new();
        let value = {
            let mut ctx = EvalContext::new(&mut diagnostics, &NullResolver);
            let mut nodes = NodeRenderer::new(&store, "p1", ScriptDialect::lua());
            object_value(&ExportObject::Npc(npc), &mut nodes, &mut ctx).await
        };

        let event = value.get_path(&["daily_routine"]).and_then(|r| r.get_index(0)).unwrap();
        assert_eq!(
            event.get_path(&["earliest_time", "total_minutes"]),
            Some(&TemplateValue::Number(480.0))
        );
        assert_eq!(
            event.get_path(&["latest_time", "total_minutes"]),
            Some(&TemplateValue::Null)
        );
        assert_eq!(
            diagnostics.summaries(),
            vec!["Unsupported Condition Or Action Code: game time `4294967295:75` is out of range in daily routine event `ev1`"]
        );
    }
}
