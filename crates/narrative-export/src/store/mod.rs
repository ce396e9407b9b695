/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Storage boundaries of the export pipeline.
//!
//! Templates and projects are read through the asynchronous
//! [`TemplateStore`] and [`ProjectStore`] traits. The pipeline never writes
//! through them. In-memory and filesystem implementations are provided.

pub mod defaults;
mod filesystem;
mod memory;
mod project;

pub use filesystem::FileSystemTemplateStore;
pub use memory::MemoryTemplateStore;
pub use project::StaticProjectStore;

use crate::model::{ExportSettings, ExportTemplate, IncludeExportTemplate, Project, TemplateType};
use async_trait::async_trait;
use narrative_template::{IncludeResolver, TemplateError, TemplateResult};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no `{template_type}` template in project `{project_id}`")]
    TemplateNotFound {
        project_id: String,
        template_type: TemplateType,
    },

    #[error("project `{0}` not found")]
    ProjectNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Source of export templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// `Ok(None)` when the project has no include with this name.
    async fn get_include_template_by_name(
        &self,
        project_id: &str,
        name: &str,
    ) -> StoreResult<Option<IncludeExportTemplate>>;

    /// The project's template for `template_type`.
    async fn get_default_template_by_type(
        &self,
        project_id: &str,
        template_type: TemplateType,
    ) -> StoreResult<ExportTemplate>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn get_default_project(&self) -> StoreResult<Project>;

    /// The project the current user works in.
    async fn get_user_project(&self) -> StoreResult<Project>;

    async fn get_export_settings(&self, project_id: &str) -> StoreResult<ExportSettings>;
}

/// Resolves `{{ include }}` directives against one project's includes.
pub struct StoreIncludeResolver<'a> {
    store: &'a dyn TemplateStore,
    project_id: &'a str,
}

impl<'a> StoreIncludeResolver<'a> {
    pub fn new(store: &'a dyn TemplateStore, project_id: &'a str) -> Self {
        Self { store, project_id }
    }
}

#[async_trait]
impl IncludeResolver for StoreIncludeResolver<'_> {
    async fn load(&self, name: &str) -> TemplateResult<Option<String>> {
        tracing::debug!(project = self.project_id, include = name, "loading include template");
        self.store
            .get_include_template_by_name(self.project_id, name)
            .await
            .map(|include| include.map(|t| t.code))
            .map_err(|err| TemplateError::IncludeLoad {
                name: name.to_string(),
                message: err.to_string(),
            })
    }
}
