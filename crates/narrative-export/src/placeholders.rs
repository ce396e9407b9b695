/*
 * placeholders.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Catalog of the placeholders each template type can use.
//!
//! The catalog documents the value objects built by the adapters. It is
//! generated from static descriptors, one tree per value object, so nested
//! members are listed with their full path. List members are written with
//! `[]`, e.g. `object.inventory[].item_id`.

use crate::model::TemplateType;
use serde::Serialize;

/// Bookkeeping member of object values that is never documented.
const HIDDEN_MEMBER: &str = "unused_fields";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTemplatePlaceholder {
    pub name: String,
    pub description: String,
}

struct Descriptor {
    name: &'static str,
    description: &'static str,
    is_list: bool,
    children: &'static [Descriptor],
}

const fn leaf(name: &'static str, description: &'static str) -> Descriptor {
    Descriptor {
        name,
        description,
        is_list: false,
        children: &[],
    }
}

const fn node(name: &'static str, description: &'static str, children: &'static [Descriptor]) -> Descriptor {
    Descriptor {
        name,
        description,
        is_list: false,
        children,
    }
}

const fn list(name: &'static str, description: &'static str, children: &'static [Descriptor]) -> Descriptor {
    Descriptor {
        name,
        description,
        is_list: true,
        children,
    }
}

const FIELD: &[Descriptor] = &[
    leaf("id", "Id of the field"),
    leaf("name", "Canonical name of the field"),
    leaf("value", "Value of the field, a number for number fields"),
    leaf("type", "Field type: single_line_text, multi_line_text, number or option"),
    leaf("script_value", "Value as a script literal, quoted unless numeric"),
    leaf("aliases", "Additional script names of the field"),
];

const STEP_REF: &[Descriptor] = &[
    leaf("id", "Id of the step"),
    leaf("function_name", "Script function of the step"),
];

const FLEX_OBJECT: &[Descriptor] = &[
    leaf("id", "Id of the object"),
    leaf("name", "Name of the object"),
    node("fields.<Field Name>", "Field by canonical name or script alias", FIELD),
    list("field_list", "All fields in declaration order", FIELD),
    list(HIDDEN_MEMBER, "Fields without script aliases", FIELD),
];

const TIME: &[Descriptor] = &[
    leaf("hours", "Hour of the day"),
    leaf("minutes", "Minute of the hour"),
    leaf("total_minutes", "Minutes since midnight"),
];

const INVENTORY_ENTRY: &[Descriptor] = &[
    leaf("item_id", "Id of the item"),
    leaf("quantity", "Number of items"),
    leaf("is_equipped", "Whether the item is equipped"),
];

const ROUTINE_EVENT: &[Descriptor] = &[
    leaf("event_id", "Id of the event"),
    node("earliest_time", "Earliest start of the event", TIME),
    node("latest_time", "Latest start of the event", TIME),
    leaf("movement_target", "Where the NPC moves, if anywhere"),
    leaf("enabled_by_default", "Whether the event starts enabled"),
    leaf("script_code", "Rendered script action of the event"),
];

const NPC_MEMBERS: &[Descriptor] = &[
    leaf("is_player_npc", "Whether the NPC is the player character"),
    list("inventory", "Items the NPC carries", INVENTORY_ENTRY),
    leaf("skills", "Ids of the skills the NPC knows"),
    list("daily_routine", "Daily routine events", ROUTINE_EVENT),
];

const ITEM_MEMBERS: &[Descriptor] = &[leaf("value", "Trade value of the item")];

const CHOICE: &[Descriptor] = &[
    leaf("id", "Id of the choice"),
    leaf("text", "Text of the choice"),
    leaf("condition", "Rendered condition, the true literal when unconditional"),
    leaf("next_function", "Function of the next step, the null literal when the dialog ends"),
];

const BRANCH: &[Descriptor] = &[
    leaf("id", "Id of the branch"),
    leaf("condition", "Rendered condition of the branch"),
    leaf("next_function", "Function of the step taken when the condition holds"),
];

const STEP: &[Descriptor] = &[
    leaf("id", "Id of the step"),
    leaf("function_name", "Script function of the step"),
    leaf("type", "Step type: npc_text, player_text, choice, condition, action or reference"),
    leaf("text", "Text of npc_text and player_text steps"),
    list("choices", "Choices of choice steps", CHOICE),
    list("branches", "Branches of condition steps", BRANCH),
    leaf("else_function", "Function of the step taken when no branch holds"),
    leaf("action", "Rendered action of action steps"),
    leaf("next_function", "Function of the next step"),
    list("parents", "Steps leading to this step", STEP_REF),
];

const DIALOG: &[Descriptor] = &[
    leaf("id", "Id of the dialog"),
    leaf("entry_function", "Function of the first step"),
    leaf("code", "Output of the project's dialog template"),
    list("steps", "Steps of the dialog", STEP),
];

const DIALOG_WITHOUT_CODE: &[Descriptor] = &[
    leaf("id", "Id of the dialog"),
    leaf("entry_function", "Function of the first step"),
    list("steps", "Steps of the dialog", STEP),
];

const LANGUAGE_KEY: &[Descriptor] = &[
    leaf("key", "Generated language key"),
    leaf("value", "Text of the key"),
];

const STEP_SCOPE: &[Descriptor] = &[
    node("cur_step", "Step the node belongs to, null outside of dialogs", STEP_REF),
    node("next_step", "Step following the node, null when there is none", STEP_REF),
];

const VALUE_FIELD: &[Descriptor] = &[
    leaf("object_id", "Id of the object owning the field"),
    leaf("field_id", "Id of the field"),
    leaf("field_name", "Canonical name of the field"),
    leaf("operator", "Comparison operator of the script dialect"),
    leaf("compare_value", "Compared value as a script literal"),
];

const QUEST_STATE: &[Descriptor] = &[
    leaf("quest_id", "Id of the quest"),
    leaf("state", "State: NotStarted, InProgress, Success or Failed"),
];

const INVENTORY: &[Descriptor] = &[
    leaf("item_id", "Id of the item"),
    leaf("quantity", "Compared quantity"),
    leaf("operator", "Check: at_least, at_maximum, has_equipped or has_not_equipped"),
    leaf("comparison", "Comparison operator for quantity checks, null for equipment checks"),
    leaf("is_equipment_check", "Whether the check is about equipment"),
    leaf("negation", "Negation prefix of the script dialect when the check is negated"),
];

const GAME_TIME: &[Descriptor] = &[
    leaf("hours", "Hour of the day"),
    leaf("minutes", "Minute of the hour"),
    leaf("total_minutes", "Minutes since midnight"),
    leaf("operator", "Check: before or after"),
    leaf("comparison", "Comparison operator of the script dialect"),
];

const RANDOM_VALUE: &[Descriptor] = &[
    leaf("min", "Lower bound"),
    leaf("max", "Upper bound"),
    leaf("operator", "Comparison operator of the script dialect"),
    leaf("compare_value", "Compared value"),
];

const ROUTINE_EVENT_CONDITION: &[Descriptor] = &[
    leaf("npc_id", "Id of the NPC"),
    leaf("event_id", "Id of the event"),
    leaf("state", "State: enabled or disabled"),
    leaf("is_enabled", "Whether the check is for an enabled event"),
    leaf("negation", "Negation prefix of the script dialect when checking for disabled"),
];

const NPC_ALIVE: &[Descriptor] = &[
    leaf("npc_id", "Id of the NPC"),
    leaf("state", "State: alive or dead"),
    leaf("negation", "Negation prefix of the script dialect when checking for dead"),
];

const CHANGE_VALUE: &[Descriptor] = &[
    leaf("object_id", "Id of the object owning the field"),
    leaf("field_id", "Id of the field"),
    leaf("field_name", "Canonical name of the field"),
    leaf("operator", "Change: set, add or subtract"),
    leaf("value", "New value or difference as a script literal"),
];

const TRANSFER_ITEM: &[Descriptor] = &[
    leaf("item_id", "Id of the item"),
    leaf("quantity", "Number of items"),
    leaf("direction", "Direction: to_player or to_npc"),
];

const ROUTINE_EVENT_ACTION: &[Descriptor] = &[
    leaf("npc_id", "Id of the NPC"),
    leaf("event_id", "Id of the event"),
    leaf("state", "New state: enabled or disabled"),
    leaf("is_enabled", "Whether the event gets enabled"),
    leaf("enabled_literal", "New state as a boolean literal of the script dialect"),
];

const CODE: &[Descriptor] = &[leaf("code", "Script code written by the author")];

const WAIT: &[Descriptor] = &[
    leaf("amount", "Amount of time to wait"),
    leaf("unit", "Unit: seconds, minutes, hours or days"),
];

/// `object` with the shared members followed by the per-type ones.
fn flatten_object(description: &str, extra: &[&[Descriptor]], out: &mut Vec<ExportTemplatePlaceholder>) {
    out.push(ExportTemplatePlaceholder {
        name: "object".to_string(),
        description: description.to_string(),
    });
    for member in FLEX_OBJECT.iter().chain(extra.iter().copied().flatten()) {
        flatten("object", member, out);
    }
}

fn flatten_node(name: &str, description: &str, members: &[Descriptor], out: &mut Vec<ExportTemplatePlaceholder>) {
    out.push(ExportTemplatePlaceholder {
        name: name.to_string(),
        description: description.to_string(),
    });
    for member in members {
        flatten(name, member, out);
    }
}

/// Snippet value object plus the step scope.
fn flatten_snippet(
    key: &str,
    description: &str,
    members: &[Descriptor],
    out: &mut Vec<ExportTemplatePlaceholder>,
) {
    flatten_node(key, description, members, out);
    flatten_top_level(STEP_SCOPE, out);
}

fn flatten_top_level(descriptors: &[Descriptor], out: &mut Vec<ExportTemplatePlaceholder>) {
    for descriptor in descriptors {
        flatten("", descriptor, out);
    }
}

fn flatten(prefix: &str, descriptor: &Descriptor, out: &mut Vec<ExportTemplatePlaceholder>) {
    if descriptor.name == HIDDEN_MEMBER {
        return;
    }
    let name = if prefix.is_empty() {
        descriptor.name.to_string()
    } else {
        format!("{}.{}", prefix, descriptor.name)
    };
    out.push(ExportTemplatePlaceholder {
        name: name.clone(),
        description: descriptor.description.to_string(),
    });

    let child_prefix = if descriptor.is_list {
        format!("{}[]", name)
    } else {
        name
    };
    for child in descriptor.children {
        flatten(&child_prefix, child, out);
    }
}

/// Placeholders available in templates of `template_type`, sorted by name.
///
/// ```
/// use narrative_export::model::TemplateType;
/// use narrative_export::placeholders::placeholders_for;
///
/// let names: Vec<_> = placeholders_for(TemplateType::ActionWait)
///     .into_iter()
///     .map(|p| p.name)
///     .collect();
/// assert!(names.contains(&"amount".to_string()));
/// assert!(names.contains(&"next_step.function_name".to_string()));
/// ```
pub fn placeholders_for(template_type: TemplateType) -> Vec<ExportTemplatePlaceholder> {
    let mut out = Vec::new();
    let dialog = "Dialog of the object, null when it has none";
    match template_type {
        TemplateType::ObjectNpc => {
            flatten_object("The exported NPC", &[NPC_MEMBERS], &mut out);
            flatten_node("dialog", dialog, DIALOG, &mut out);
        }
        TemplateType::ObjectItem => {
            flatten_object("The exported item", &[ITEM_MEMBERS], &mut out);
            flatten_node("dialog", dialog, DIALOG, &mut out);
        }
        TemplateType::ObjectSkill => {
            flatten_object("The exported skill", &[], &mut out);
            flatten_node("dialog", dialog, DIALOG, &mut out);
        }
        TemplateType::LanguageFile => flatten_top_level(
            &[list("language_keys", "Language keys recorded by the script export", LANGUAGE_KEY)],
            &mut out,
        ),
        TemplateType::Dialog => {
            // Dialogs belong to any kind of object.
            flatten_object(
                "The object owning the dialog, with the members of its kind",
                &[NPC_MEMBERS, ITEM_MEMBERS],
                &mut out,
            );
            flatten_node("dialog", "The exported dialog", DIALOG_WITHOUT_CODE, &mut out);
        }
        TemplateType::ConditionValueField => {
            flatten_snippet("value_field", "Compared field", VALUE_FIELD, &mut out)
        }
        TemplateType::ConditionQuestState | TemplateType::ActionSetQuestState => {
            flatten_snippet("quest_state", "Quest and state", QUEST_STATE, &mut out)
        }
        TemplateType::ConditionInventory => {
            flatten_snippet("inventory", "Checked inventory item", INVENTORY, &mut out)
        }
        TemplateType::ConditionGameTime => {
            flatten_snippet("game_time", "Compared game time", GAME_TIME, &mut out)
        }
        TemplateType::ConditionRandomValue => {
            flatten_snippet("random_value", "Random number check", RANDOM_VALUE, &mut out)
        }
        TemplateType::ConditionDailyRoutineEventState => flatten_snippet(
            "routine_event",
            "Checked daily routine event",
            ROUTINE_EVENT_CONDITION,
            &mut out,
        ),
        TemplateType::ConditionNpcAliveState => {
            flatten_snippet("npc_alive", "Checked NPC", NPC_ALIVE, &mut out)
        }
        TemplateType::ConditionCode | TemplateType::ActionCode => {
            flatten_top_level(CODE, &mut out);
            flatten_top_level(STEP_SCOPE, &mut out);
        }
        TemplateType::ActionChangeValueField => {
            flatten_snippet("change_value", "Changed field", CHANGE_VALUE, &mut out)
        }
        TemplateType::ActionTransferItem => {
            flatten_snippet("transfer_item", "Transferred item", TRANSFER_ITEM, &mut out)
        }
        TemplateType::ActionSetDailyRoutineEventState => flatten_snippet(
            "routine_event",
            "Changed daily routine event",
            ROUTINE_EVENT_ACTION,
            &mut out,
        ),
        TemplateType::ActionWait => {
            flatten_top_level(WAIT, &mut out);
            flatten_top_level(STEP_SCOPE, &mut out);
        }
    }
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}
