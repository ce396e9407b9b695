/*
 * template.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Export templates as stored per project.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a template renders.
///
/// Object and file templates render whole artifacts; the condition and
/// action types are snippet templates rendering one configuration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    ObjectNpc,
    ObjectItem,
    ObjectSkill,
    LanguageFile,
    Dialog,
    ConditionValueField,
    ConditionQuestState,
    ConditionInventory,
    ConditionGameTime,
    ConditionRandomValue,
    ConditionDailyRoutineEventState,
    ConditionNpcAliveState,
    ConditionCode,
    ActionChangeValueField,
    ActionSetQuestState,
    ActionTransferItem,
    ActionSetDailyRoutineEventState,
    ActionWait,
    ActionCode,
}

impl TemplateType {
    pub const ALL: [TemplateType; 19] = [
        TemplateType::ObjectNpc,
        TemplateType::ObjectItem,
        TemplateType::ObjectSkill,
        TemplateType::LanguageFile,
        TemplateType::Dialog,
        TemplateType::ConditionValueField,
        TemplateType::ConditionQuestState,
        TemplateType::ConditionInventory,
        TemplateType::ConditionGameTime,
        TemplateType::ConditionRandomValue,
        TemplateType::ConditionDailyRoutineEventState,
        TemplateType::ConditionNpcAliveState,
        TemplateType::ConditionCode,
        TemplateType::ActionChangeValueField,
        TemplateType::ActionSetQuestState,
        TemplateType::ActionTransferItem,
        TemplateType::ActionSetDailyRoutineEventState,
        TemplateType::ActionWait,
        TemplateType::ActionCode,
    ];

    /// Stable snake_case name, used for file names and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TemplateType::ObjectNpc => "object_npc",
            TemplateType::ObjectItem => "object_item",
            TemplateType::ObjectSkill => "object_skill",
            TemplateType::LanguageFile => "language_file",
            TemplateType::Dialog => "dialog",
            TemplateType::ConditionValueField => "condition_value_field",
            TemplateType::ConditionQuestState => "condition_quest_state",
            TemplateType::ConditionInventory => "condition_inventory",
            TemplateType::ConditionGameTime => "condition_game_time",
            TemplateType::ConditionRandomValue => "condition_random_value",
            TemplateType::ConditionDailyRoutineEventState => "condition_daily_routine_event_state",
            TemplateType::ConditionNpcAliveState => "condition_npc_alive_state",
            TemplateType::ConditionCode => "condition_code",
            TemplateType::ActionChangeValueField => "action_change_value_field",
            TemplateType::ActionSetQuestState => "action_set_quest_state",
            TemplateType::ActionTransferItem => "action_transfer_item",
            TemplateType::ActionSetDailyRoutineEventState => {
                "action_set_daily_routine_event_state"
            }
            TemplateType::ActionWait => "action_wait",
            TemplateType::ActionCode => "action_code",
        }
    }

    pub fn from_name(name: &str) -> Option<TemplateType> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Whether this type renders a single condition or action node.
    pub fn is_snippet(self) -> bool {
        !matches!(
            self,
            TemplateType::ObjectNpc
                | TemplateType::ObjectItem
                | TemplateType::ObjectSkill
                | TemplateType::LanguageFile
                | TemplateType::Dialog
        )
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateType::from_name(s).ok_or_else(|| format!("unknown template type `{}`", s))
    }
}

/// Which engine interprets a template's code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderingEngine {
    /// Full template language with pipes, conditionals, loops and includes.
    #[default]
    Template,
    /// Plain `{{Dotted.Path}}` substitution.
    Legacy,
}

/// A project's template for one [`TemplateType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTemplate {
    pub id: String,
    pub project_id: String,
    pub template_type: TemplateType,
    pub code: String,
    #[serde(default)]
    pub rendering_engine: RenderingEngine,
}

impl ExportTemplate {
    pub fn new(project_id: impl Into<String>, template_type: TemplateType, code: impl Into<String>) -> Self {
        let project_id = project_id.into();
        Self {
            id: format!("{}/{}", project_id, template_type.name()),
            project_id,
            template_type,
            code: code.into(),
            rendering_engine: RenderingEngine::Template,
        }
    }

    pub fn with_rendering_engine(mut self, engine: RenderingEngine) -> Self {
        self.rendering_engine = engine;
        self
    }
}

/// A named template fragment, referenced with `{{ include "Name" }}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeExportTemplate {
    pub project_id: String,
    pub name: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique_and_parse_back() {
        let mut names: Vec<_> = TemplateType::ALL.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TemplateType::ALL.len());
        assert_eq!("action_wait".parse::<TemplateType>(), Ok(TemplateType::ActionWait));
        assert!("object_quest".parse::<TemplateType>().is_err());
    }

    #[test]
    fn test_snippet_types() {
        assert!(TemplateType::ConditionCode.is_snippet());
        assert!(!TemplateType::Dialog.is_snippet());
    }

    #[test]
    fn test_serde_name_matches_name() {
        let json = serde_json::to_string(&TemplateType::ConditionDailyRoutineEventState).unwrap();
        assert_eq!(json, "\"condition_daily_routine_event_state\"");
    }
}
