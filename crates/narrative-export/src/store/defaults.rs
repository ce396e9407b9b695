/*
 * defaults.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Built-in templates used when a project does not define its own.
//!
//! The defaults target a Lua runtime exposing `GetField`, `GetQuestState`,
//! `Localize` and friends. Operators and literals inside snippets come from
//! the project's script dialect, so the snippet defaults also work for the
//! C-like preset as long as the runtime functions exist.

use crate::model::{ExportTemplate, TemplateType};

const OBJECT_NPC: &str = r#"-- {{ object.name }}
local npc = NewNpc("{{ object.id }}")
npc.name = Localize("{{ object.name | langkey }}")
npc.is_player = {{ object.is_player_npc }}
{{~ for field in object.field_list }}
npc.fields["{{ field.name | escape }}"] = {{ field.script_value }}
{{~ end }}
{{~ for entry in object.inventory }}
AddInventoryItem(npc, "{{ entry.item_id }}", {{ entry.quantity }}, {{ entry.is_equipped }})
{{~ end }}
{{~ for skill in object.skills }}
AddSkill(npc, "{{ skill }}")
{{~ end }}
{{~ for event in object.daily_routine }}
AddRoutineEvent(npc, "{{ event.event_id }}", {{ event.earliest_time.total_minutes }}, {{ event.latest_time.total_minutes }}, {{ event.enabled_by_default }}, function()
    {{ event.script_code }}
end)
{{~ end }}
{{~ if dialog }}

{{ dialog.code }}
npc.dialog = {{ dialog.entry_function }}
{{~ end }}
return npc
"#;

const OBJECT_ITEM: &str = r#"-- {{ object.name }}
local item = NewItem("{{ object.id }}")
item.name = Localize("{{ object.name | langkey }}")
item.value = {{ object.value }}
{{~ for field in object.field_list }}
item.fields["{{ field.name | escape }}"] = {{ field.script_value }}
{{~ end }}
return item
"#;

const OBJECT_SKILL: &str = r#"-- {{ object.name }}
local skill = NewSkill("{{ object.id }}")
skill.name = Localize("{{ object.name | langkey }}")
{{~ for field in object.field_list }}
skill.fields["{{ field.name | escape }}"] = {{ field.script_value }}
{{~ end }}
return skill
"#;

const LANGUAGE_FILE: &str = "{{ for entry in language_keys }}{{ entry.key }} = \"{{ entry.value | escape }}\"\n{{ end }}";

const DIALOG: &str = r#"{{ for step in dialog.steps ~}}
function {{ step.function_name }}()
{{~ if step.type == "npc_text" }}
    NpcSay(Localize("{{ step.text | langkey }}"))
{{~ else if step.type == "player_text" }}
    PlayerSay(Localize("{{ step.text | langkey }}"))
{{~ else if step.type == "choice" }}
{{~ for choice in step.choices }}
    AddChoice(Localize("{{ choice.text | langkey }}"), function() return {{ choice.condition }} end, {{ choice.next_function }})
{{~ end }}
    return ShowChoices()
{{~ else if step.type == "condition" }}
{{~ for branch in step.branches }}
    {{ if loop.first }}if{{ else }}elseif{{ end }} {{ branch.condition }} then
{{~ if branch.next_function }}
        return {{ branch.next_function }}()
{{~ end }}
{{~ end }}
{{~ if step.else_function }}
    else
        return {{ step.else_function }}()
{{~ end }}
    end
{{~ else if step.type == "action" }}
    {{ step.action }}
{{~ end }}
{{~ if step.next_function }}
    return {{ step.next_function }}()
{{~ end }}
end
{{ end }}"#;

const CONDITION_VALUE_FIELD: &str = r#"GetField("{{ value_field.object_id }}", "{{ value_field.field_name }}") {{ value_field.operator }} {{ value_field.compare_value }}"#;

const CONDITION_QUEST_STATE: &str =
    r#"GetQuestState("{{ quest_state.quest_id }}") == QuestState.{{ quest_state.state }}"#;

const CONDITION_INVENTORY: &str = r#"{{ if inventory.is_equipment_check }}{{ inventory.negation }}IsItemEquipped("{{ inventory.item_id }}"){{ else }}GetItemCount("{{ inventory.item_id }}") {{ inventory.comparison }} {{ inventory.quantity }}{{ end }}"#;

const CONDITION_GAME_TIME: &str =
    "GetGameTimeMinutes() {{ game_time.comparison }} {{ game_time.total_minutes }}";

const CONDITION_RANDOM_VALUE: &str = "RandomValue({{ random_value.min }}, {{ random_value.max }}) {{ random_value.operator }} {{ random_value.compare_value }}";

const CONDITION_DAILY_ROUTINE_EVENT_STATE: &str = r#"{{ routine_event.negation }}IsDailyRoutineEventEnabled("{{ routine_event.npc_id }}", "{{ routine_event.event_id }}")"#;

const CONDITION_NPC_ALIVE_STATE: &str =
    r#"{{ npc_alive.negation }}IsNpcAlive("{{ npc_alive.npc_id }}")"#;

const CODE: &str = "{{ code }}";

const ACTION_CHANGE_VALUE_FIELD: &str = r#"{{ if change_value.operator == "set" }}SetField{{ else if change_value.operator == "add" }}AddToField{{ else }}SubtractFromField{{ end }}("{{ change_value.object_id }}", "{{ change_value.field_name }}", {{ change_value.value }})"#;

const ACTION_SET_QUEST_STATE: &str =
    r#"SetQuestState("{{ quest_state.quest_id }}", QuestState.{{ quest_state.state }})"#;

const ACTION_TRANSFER_ITEM: &str = r#"{{ if transfer_item.direction == "to_player" }}GiveItemToPlayer{{ else }}TakeItemFromPlayer{{ end }}("{{ transfer_item.item_id }}", {{ transfer_item.quantity }})"#;

const ACTION_SET_DAILY_ROUTINE_EVENT_STATE: &str = r#"SetDailyRoutineEventEnabled("{{ routine_event.npc_id }}", "{{ routine_event.event_id }}", {{ routine_event.enabled_literal }})"#;

const ACTION_WAIT: &str = r#"Wait({{ amount }}, "{{ unit }}")"#;

/// Code of the built-in template for `template_type`.
pub fn default_code(template_type: TemplateType) -> &'static str {
    match template_type {
        TemplateType::ObjectNpc => OBJECT_NPC,
        TemplateType::ObjectItem => OBJECT_ITEM,
        TemplateType::ObjectSkill => OBJECT_SKILL,
        TemplateType::LanguageFile => LANGUAGE_FILE,
        TemplateType::Dialog => DIALOG,
        TemplateType::ConditionValueField => CONDITION_VALUE_FIELD,
        TemplateType::ConditionQuestState => CONDITION_QUEST_STATE,
        TemplateType::ConditionInventory => CONDITION_INVENTORY,
        TemplateType::ConditionGameTime => CONDITION_GAME_TIME,
        TemplateType::ConditionRandomValue => CONDITION_RANDOM_VALUE,
        TemplateType::ConditionDailyRoutineEventState => CONDITION_DAILY_ROUTINE_EVENT_STATE,
        TemplateType::ConditionNpcAliveState => CONDITION_NPC_ALIVE_STATE,
        TemplateType::ConditionCode | TemplateType::ActionCode => CODE,
        TemplateType::ActionChangeValueField => ACTION_CHANGE_VALUE_FIELD,
        TemplateType::ActionSetQuestState => ACTION_SET_QUEST_STATE,
        TemplateType::ActionTransferItem => ACTION_TRANSFER_ITEM,
        TemplateType::ActionSetDailyRoutineEventState => ACTION_SET_DAILY_ROUTINE_EVENT_STATE,
        TemplateType::ActionWait => ACTION_WAIT,
    }
}

/// The built-in template for `template_type`, owned by `project_id`.
pub fn default_template(project_id: &str, template_type: TemplateType) -> ExportTemplate {
    ExportTemplate::new(project_id, template_type, default_code(template_type))
}
