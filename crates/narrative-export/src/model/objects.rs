/*
 * objects.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Exportable domain objects and the typed export data bundle.

use crate::model::conditions::ActionNode;
use crate::model::dialog::ExportDialog;
use crate::model::flex_field::FlexFieldObject;
use crate::model::template::TemplateType;
use serde::{Deserialize, Serialize};

/// Template variable holding the exported object.
pub const EXPORT_DATA_OBJECT: &str = "object";
/// Template variable holding the object's dialog, if any.
pub const EXPORT_DATA_DIALOG: &str = "dialog";
/// Template variable holding the recorded language keys.
pub const EXPORT_DATA_LANGUAGE_KEYS: &str = "language_keys";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub item_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub is_equipped: bool,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameTime {
    pub hours: u32,
    pub minutes: u32,
}

impl GameTime {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    /// Whether the time lies within one day.
    pub fn is_valid(self) -> bool {
        self.hours < 24 && self.minutes < 60
    }

    /// Minutes since midnight, or `None` when the time is out of range.
    pub fn total_minutes(self) -> Option<u32> {
        self.is_valid().then(|| self.hours * 60 + self.minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRoutineEvent {
    pub event_id: String,
    pub earliest_time: GameTime,
    pub latest_time: GameTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<ActionNode>,
    #[serde(default = "default_enabled")]
    pub enabled_by_default: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Npc {
    #[serde(flatten)]
    pub base: FlexFieldObject,
    #[serde(default)]
    pub is_player_npc: bool,
    #[serde(default)]
    pub inventory: Vec<InventoryEntry>,
    /// Ids of the skills the NPC knows.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub daily_routine: Vec<DailyRoutineEvent>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(flatten)]
    pub base: FlexFieldObject,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Skill {
    #[serde(flatten)]
    pub base: FlexFieldObject,
}

/// The object being exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportObject {
    Npc(Npc),
    Item(Item),
    Skill(Skill),
}

impl ExportObject {
    pub fn base(&self) -> &FlexFieldObject {
        match self {
            ExportObject::Npc(npc) => &npc.base,
            ExportObject::Item(item) => &item.base,
            ExportObject::Skill(skill) => &skill.base,
        }
    }

    /// Object template type used when no template is passed explicitly.
    pub fn template_type(&self) -> TemplateType {
        match self {
            ExportObject::Npc(_) => TemplateType::ObjectNpc,
            ExportObject::Item(_) => TemplateType::ObjectItem,
            ExportObject::Skill(_) => TemplateType::ObjectSkill,
        }
    }
}

/// Everything one export reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportObjectData {
    pub object: ExportObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog: Option<ExportDialog>,
}

impl ExportObjectData {
    pub fn new(object: ExportObject) -> Self {
        Self {
            object,
            dialog: None,
        }
    }

    pub fn with_dialog(mut self, dialog: ExportDialog) -> Self {
        self.dialog = Some(dialog);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_npc_from_json() {
        let data: ExportObjectData = serde_json::from_value(serde_json::json!({
            "object": {
                "kind": "npc",
                "id": "npc-1",
                "name": "Grom",
                "fields": [{ "id": "f1", "name": "Health", "value": "10", "field_type": "number" }],
                "inventory": [{ "item_id": "axe" }]
            }
        }))
        .unwrap();

        let ExportObject::Npc(npc) = &data.object else {
            panic!("expected an npc, got {:?}", data.object);
        };
        assert_eq!(npc.base.name, "Grom");
        assert_eq!(npc.inventory[0].quantity, 1);
        assert_eq!(data.object.template_type(), TemplateType::ObjectNpc);
        assert!(data.dialog.is_none());
    }

    #[test]
    fn test_game_time_total_minutes() {
        assert_eq!(GameTime::new(7, 30).total_minutes(), Some(450));
        assert_eq!(GameTime::new(23, 59).total_minutes(), Some(1439));
        assert_eq!(GameTime::new(24, 0).total_minutes(), None);
        assert_eq!(GameTime::new(0, 60).total_minutes(), None);
        assert_eq!(GameTime::new(u32::MAX, u32::MAX).total_minutes(), None);
    }
}
