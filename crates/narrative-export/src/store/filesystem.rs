/*
 * filesystem.rs
 * Copyright (c) 2025 Posit, PBC
 */

use super::{StoreError, StoreResult, TemplateStore, defaults};
use crate::model::{ExportTemplate, IncludeExportTemplate, RenderingEngine, TemplateType};
use async_trait::async_trait;
use narrative_template::FileSystemResolver;
use std::path::{Path, PathBuf};

/// Template store reading one project's templates from a directory.
///
/// ```text
/// templates/
///   object_npc.template        # template engine
///   condition_code.legacy      # legacy placeholder substitution
///   includes/
///     Header.template
/// ```
///
/// A `.template` file wins over a `.legacy` file of the same type.
#[derive(Debug, Clone)]
pub struct FileSystemTemplateStore {
    root: PathBuf,
    includes: FileSystemResolver,
    use_defaults: bool,
}

impl FileSystemTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            includes: FileSystemResolver::new(root.join("includes")),
            root,
            use_defaults: true,
        }
    }

    /// Report missing types instead of falling back to the built-in defaults.
    pub fn without_defaults(mut self) -> Self {
        self.use_defaults = false;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

async fn read_optional(path: &Path) -> StoreResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::Io(e)),
    }
}

#[async_trait]
impl TemplateStore for FileSystemTemplateStore {
    async fn get_include_template_by_name(
        &self,
        project_id: &str,
        name: &str,
    ) -> StoreResult<Option<IncludeExportTemplate>> {
        let path = self
            .includes
            .include_path(name)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(read_optional(&path).await?.map(|code| IncludeExportTemplate {
            project_id: project_id.to_string(),
            name: name.to_string(),
            code,
        }))
    }

    async fn get_default_template_by_type(
        &self,
        project_id: &str,
        template_type: TemplateType,
    ) -> StoreResult<ExportTemplate> {
        let candidates = [
            ("template", RenderingEngine::Template),
            ("legacy", RenderingEngine::Legacy),
        ];
        for (extension, engine) in candidates {
            let path = self
                .root
                .join(format!("{}.{}", template_type.name(), extension));
            if let Some(code) = read_optional(&path).await? {
                tracing::debug!(path = %path.display(), "loaded export template");
                return Ok(ExportTemplate::new(project_id, template_type, code).with_rendering_engine(engine));
            }
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
