/*
 * language.rs
 * Copyright (c) 2025 Posit, PBC
 */

use super::{ExportObjectResult, ObjectExporter, ScriptExporter};
use crate::error::ExportError;
use crate::errors::ExportPlaceholderErrorCollection;
use crate::model::{ExportObjectData, ExportTemplate, TemplateType};
use crate::renderer::PlaceholderResolver;
use async_trait::async_trait;

/// Exports the language file of an object.
///
/// The script export runs first since language keys only exist once the
/// `langkey` pipes of the script template were evaluated. Its code is
/// discarded, its diagnostics are kept ahead of the language file's.
#[derive(Clone)]
pub struct LanguageExporter {
    script: ScriptExporter,
}

impl LanguageExporter {
    pub fn new(script: ScriptExporter) -> Self {
        Self { script }
    }
}

#[async_trait]
impl ObjectExporter for LanguageExporter {
    async fn export(
        &self,
        template: Option<&ExportTemplate>,
        data: &ExportObjectData,
    ) -> Result<ExportObjectResult, ExportError> {
        let mut errors = ExportPlaceholderErrorCollection::new();
        let render = self.script.render(template, data, &mut errors).await?;

        let language_template = self
            .script
            .top_level_template(&render.project.id, TemplateType::LanguageFile)
            .await?;
        let code = PlaceholderResolver::new(self.script.templates(), &render.project.id, &render.settings)
            .fill_language_file(&language_template, &render.output.language_keys, &mut errors)
            .await;

        Ok(ExportObjectResult::new(
            code,
            render.settings.language_file_extension,
            errors,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExportPlaceholderErrorType;
    use crate::model::{ExportObject, ExportSettings, FlexFieldObject, Project, Skill};
    use crate::store::{MemoryTemplateStore, StaticProjectStore};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_script_diagnostics_come_first() {
        let mut store = MemoryTemplateStore::new();
        store.add_template(ExportTemplate::new(
            "p1",
            TemplateType::ObjectSkill,
            "{{ object.name | langkey }} {{ object.missing }}",
        ));
        store.add_template(ExportTemplate::new(
            "p1",
            TemplateType::LanguageFile,
            "{{ for entry in language_keys }}{{ entry.key }}={{ entry.value }};{{ end }}{{ include \"Footer\" }}",
        ));
        let projects = StaticProjectStore::new(Project::new("p1", "Demo"), ExportSettings::default());
        let exporter = LanguageExporter::new(ScriptExporter::new(Arc::new(store), Arc::new(projects)));
        let data = ExportObjectData::new(ExportObject::Skill(Skill {
            base: FlexFieldObject::new("skill-1", "Fireball"),
        }));

        let result = exporter.export(None, &data).await.unwrap();

        assert_eq!(
            result.code,
            format!("L_skill_1_name=Fireball;{}", narrative_template::INCLUDE_NOT_FOUND_SENTINEL)
        );
        assert_eq!(result.file_extension, "txt");
        let kinds: Vec<_> = result.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ExportPlaceholderErrorType::UnresolvedPlaceholder,
                ExportPlaceholderErrorType::MissingIncludeTemplate,
            ]
        );
    }
}
