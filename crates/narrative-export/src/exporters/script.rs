/*
 * script.rs
 * Copyright (c) 2025 Posit, PBC
 */

use super::{ExportObjectResult, ObjectExporter};
use crate::error::ExportError;
use crate::errors::ExportPlaceholderErrorCollection;
use crate::model::{ExportObjectData, ExportSettings, ExportTemplate, Project, TemplateType};
use crate::renderer::{PlaceholderResolver, RenderOutput};
use crate::store::{ProjectStore, TemplateStore};
use crate::xss;
use async_trait::async_trait;
use narrative_template::PrefixedLanguageKeyGenerator;
use std::sync::Arc;

/// Renders an object through its script template.
#[derive(Clone)]
pub struct ScriptExporter {
    templates: Arc<dyn TemplateStore>,
    projects: Arc<dyn ProjectStore>,
}

/// A finished script render and the project it was rendered for.
pub(crate) struct ScriptRender {
    pub output: RenderOutput,
    pub project: Project,
    pub settings: ExportSettings,
}

impl ScriptExporter {
    pub fn new(templates: Arc<dyn TemplateStore>, projects: Arc<dyn ProjectStore>) -> Self {
        Self {
            templates,
            projects,
        }
    }

    pub(crate) fn templates(&self) -> &dyn TemplateStore {
        self.templates.as_ref()
    }

    /// Project of the current user and its export settings.
    pub(crate) async fn user_project(&self) -> Result<(Project, ExportSettings), ExportError> {
        let project = self.projects.get_user_project().await.map_err(|err| {
            tracing::warn!(error = %err, "could not load the user project");
            ExportError::Project(err)
        })?;
        let settings = self
            .projects
            .get_export_settings(&project.id)
            .await
            .map_err(|err| {
                tracing::warn!(project = %project.id, error = %err, "could not load export settings");
                ExportError::Project(err)
            })?;
        Ok((project, settings))
    }

    /// The project's template for `template_type`; failing to get it aborts the export.
    pub(crate) async fn top_level_template(
        &self,
        project_id: &str,
        template_type: TemplateType,
    ) -> Result<ExportTemplate, ExportError> {
        self.templates
            .get_default_template_by_type(project_id, template_type)
            .await
            .map_err(|source| {
                tracing::warn!(project = project_id, %template_type, error = %source, "could not load export template");
                ExportError::Template {
                    template_type,
                    source,
                }
            })
    }

    /// Check, resolve and render, recording diagnostics in `errors`.
    pub(crate) async fn render(
        &self,
        template: Option<&ExportTemplate>,
        data: &ExportObjectData,
        errors: &mut ExportPlaceholderErrorCollection,
    ) -> Result<ScriptRender, ExportError> {
        xss::check_export_data(data)?;
        let (project, settings) = self.user_project().await?;

        let fetched;
        let template = match template {
            Some(template) => template,
            None => {
                fetched = self
                    .top_level_template(&project.id, data.object.template_type())
                    .await?;
                &fetched
            }
        };

        let generator = PrefixedLanguageKeyGenerator::new(settings.language_key_prefix.as_str());
        let output = PlaceholderResolver::new(self.templates(), &project.id, &settings)
            .fill_placeholders(template, data, Some(&generator), errors)
            .await;

        Ok(ScriptRender {
            output,
            project,
            settings,
        })
    }
}

#[async_trait]
impl ObjectExporter for ScriptExporter {
    async fn export(
        &self,
        template: Option<&ExportTemplate>,
        data: &ExportObjectData,
    ) -> Result<ExportObjectResult, ExportError> {
        let mut errors = ExportPlaceholderErrorCollection::new();
        let render = self.render(template, data, &mut errors).await?;
        Ok(ExportObjectResult::new(
            render.output.code,
            render.settings.script_extension,
            errors,
        ))
    }
}
