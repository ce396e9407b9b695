/*
 * json.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! JSON projections of exported objects.
//!
//! Each object type has an explicit projection. Bookkeeping members are
//! copied for completeness but skipped on serialization.

use super::{ExportObjectResult, ObjectExporter};
use crate::error::ExportError;
use crate::errors::ExportPlaceholderErrorCollection;
use crate::model::{
    DailyRoutineEvent, ExportDialog, ExportObject, ExportObjectData, ExportTemplate, FlexField,
    FlexFieldObject, InventoryEntry, Item, Npc, Skill,
};
use crate::xss;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FlexFieldJsonExport {
    pub id: String,
    pub name: String,
    pub fields: Vec<FlexField>,
    #[serde(skip)]
    pub project_id: String,
    #[serde(skip)]
    pub modified_by: Option<String>,
    #[serde(skip)]
    pub modified_on: Option<String>,
}

impl From<&FlexFieldObject> for FlexFieldJsonExport {
    fn from(object: &FlexFieldObject) -> Self {
        Self {
            id: object.id.clone(),
            name: object.name.clone(),
            fields: object.fields.clone(),
            project_id: object.project_id.clone(),
            modified_by: object.modified_by.clone(),
            modified_on: object.modified_on.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NpcJsonExport {
    #[serde(flatten)]
    pub base: FlexFieldJsonExport,
    pub is_player_npc: bool,
    pub inventory: Vec<InventoryEntry>,
    pub skills: Vec<String>,
    pub daily_routine: Vec<DailyRoutineEvent>,
    pub dialog: Option<ExportDialog>,
}

impl NpcJsonExport {
    pub fn new(npc: &Npc, dialog: Option<&ExportDialog>) -> Self {
        Self {
            base: (&npc.base).into(),
            is_player_npc: npc.is_player_npc,
            inventory: npc.inventory.clone(),
            skills: npc.skills.clone(),
            daily_routine: npc.daily_routine.clone(),
            dialog: dialog.cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemJsonExport {
    #[serde(flatten)]
    pub base: FlexFieldJsonExport,
    pub value: f64,
    pub dialog: Option<ExportDialog>,
}

impl ItemJsonExport {
    pub fn new(item: &Item, dialog: Option<&ExportDialog>) -> Self {
        Self {
            base: (&item.base).into(),
            value: item.value,
            dialog: dialog.cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillJsonExport {
    #[serde(flatten)]
    pub base: FlexFieldJsonExport,
    pub dialog: Option<ExportDialog>,
}

impl SkillJsonExport {
    pub fn new(skill: &Skill, dialog: Option<&ExportDialog>) -> Self {
        Self {
            base: (&skill.base).into(),
            dialog: dialog.cloned(),
        }
    }
}

/// Serializes an object and its dialog as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn to_json(data: &ExportObjectData) -> Result<String, ExportError> {
        let dialog = data.dialog.as_ref();
        let json = match &data.object {
            ExportObject::Npc(npc) => serde_json::to_string_pretty(&NpcJsonExport::new(npc, dialog))?,
            ExportObject::Item(item) => serde_json::to_string_pretty(&ItemJsonExport::new(item, dialog))?,
            ExportObject::Skill(skill) => {
                serde_json::to_string_pretty(&SkillJsonExport::new(skill, dialog))?
            }
        };
        Ok(json)
    }
}

#[async_trait]
impl ObjectExporter for JsonExporter {
    async fn export(
        &self,
        _template: Option<&ExportTemplate>,
        data: &ExportObjectData,
    ) -> Result<ExportObjectResult, ExportError> {
        xss::check_export_data(data)?;
        let code = Self::to_json(data)?;
        Ok(ExportObjectResult::new(code, "json", ExportPlaceholderErrorCollection::new()))
    }
}
