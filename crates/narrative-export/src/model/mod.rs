/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Data model of the export pipeline.
//!
//! Everything here is plain data read by the renderers. Nothing in the
//! model is mutated while an export runs.

pub mod conditions;
pub mod dialog;
pub mod flex_field;
pub mod objects;
pub mod project;
pub mod template;

pub use conditions::{ActionNode, ConditionNode};
pub use dialog::{ConditionBranch, DialogChoice, ExportDialog, ExportDialogStep, StepContent};
pub use flex_field::{ALIAS_SEPARATOR, FlexField, FlexFieldObject, FlexFieldType, ScriptSettings};
pub use objects::{
    DailyRoutineEvent, EXPORT_DATA_DIALOG, EXPORT_DATA_LANGUAGE_KEYS, EXPORT_DATA_OBJECT,
    ExportObject, ExportObjectData, GameTime, InventoryEntry, Item, Npc, Skill,
};
pub use project::{ExportSettings, Project};
pub use template::{ExportTemplate, IncludeExportTemplate, RenderingEngine, TemplateType};
