/*
 * memory.rs
 * Copyright (c) 2025 Posit, PBC
 */

use super::{StoreError, StoreResult, TemplateStore, defaults};
use crate::model::{ExportTemplate, IncludeExportTemplate, TemplateType};
use async_trait::async_trait;
use std::collections::HashMap;

/// Template store kept in memory.
///
/// Types without a stored template fall back to the built-in defaults
/// unless the store was created with [`MemoryTemplateStore::without_defaults`].
#[derive(Debug, Clone)]
pub struct MemoryTemplateStore {
    templates: HashMap<(String, TemplateType), ExportTemplate>,
    includes: HashMap<(String, String), IncludeExportTemplate>,
    use_defaults: bool,
}

impl Default for MemoryTemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            includes: HashMap::new(),
            use_defaults: true,
        }
    }

    /// A store that only serves what was added to it.
    pub fn without_defaults() -> Self {
        Self {
            use_defaults: false,
            ..Self::new()
        }
    }

    /// Add or replace the template of its project and type.
    pub fn add_template(&mut self, template: ExportTemplate) -> &mut Self {
        self.templates
            .insert((template.project_id.clone(), template.template_type), template);
        self
    }

    pub fn add_include(
        &mut self,
        project_id: impl Into<String>,
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> &mut Self {
        let include = IncludeExportTemplate {
            project_id: project_id.into(),
            name: name.into(),
            code: code.into(),
        };
        self.includes
            .insert((include.project_id.clone(), include.name.clone()), include);
        self
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn get_include_template_by_name(
        &self,
        project_id: &str,
        name: &str,
    ) -> StoreResult<Option<IncludeExportTemplate>> {
        Ok(self
            .includes
            .get(&(project_id.to_string(), name.to_string()))
            .cloned())
    }

    async fn get_default_template_by_type(
        &self,
        project_id: &str,
        template_type: TemplateType,
    ) -> StoreResult<ExportTemplate> {
        if let Some(template) = self.templates.get(&(project_id.to_string(), template_type)) {
            return Ok(template.clone());
        }
        if self.use_defaults {
            return Ok(defaults::default_template(project_id, template_type));
        }
        Err(StoreError::TemplateNotFound {
            project_id: project_id.to_string(),
            template_type,
        })
    }
}
