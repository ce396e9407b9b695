/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Export pipeline for game narrative data.
//!
//! NPCs, items and skills, together with their dialogs, are rendered into
//! game scripts, JSON payloads and language files using per-project
//! templates.
//!
//! # Architecture
//!
//! An [`exporters::ObjectExporter`] resolves the user's project and
//! settings, fetches the template and hands it to the
//! [`renderer::PlaceholderResolver`]. The resolver builds the template
//! variables with the [`adapter`] and [`dialog_adapter`] mappings, renders
//! condition and action trees through their snippet templates
//! ([`conditions`]), and evaluates the result with `narrative-template`.
//!
//! Problems found on the way are collected in an
//! [`errors::ExportPlaceholderErrorCollection`] and returned next to the
//! output. Only the failures on [`ExportError`] abort an export.
//!
//! # Example
//!
//! ```
//! use narrative_export::exporters::{ExportFormat, ExportService};
//! use narrative_export::model::{
//!     ExportObject, ExportObjectData, ExportSettings, ExportTemplate, FlexFieldObject, Project,
//!     Skill, TemplateType,
//! };
//! use narrative_export::store::{MemoryTemplateStore, StaticProjectStore};
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let service = ExportService::new(
//!     Arc::new(MemoryTemplateStore::new()),
//!     Arc::new(StaticProjectStore::new(Project::new("p1", "Demo"), ExportSettings::default())),
//! );
//! let data = ExportObjectData::new(ExportObject::Skill(Skill {
//!     base: FlexFieldObject::new("skill-1", "Fireball"),
//! }));
//! let template = ExportTemplate::new("p1", TemplateType::ObjectSkill, "Learn {{ object.name }}");
//!
//! let result = service
//!     .export(ExportFormat::Script, Some(&template), &data)
//!     .await
//!     .unwrap();
//! assert_eq!(result.code, "Learn Fireball");
//! assert_eq!(result.file_extension, "lua");
//! # });
//! ```

pub mod adapter;
pub mod codes;
pub mod conditions;
pub mod dialog_adapter;
pub mod error;
pub mod errors;
pub mod exporters;
pub mod model;
pub mod placeholders;
pub mod renderer;
pub mod store;
pub mod xss;

pub use error::ExportError;
pub use errors::{ExportPlaceholderError, ExportPlaceholderErrorCollection, ExportPlaceholderErrorType};
pub use exporters::{ExportFormat, ExportObjectResult, ExportService, ObjectExporter};
pub use placeholders::{ExportTemplatePlaceholder, placeholders_for};
