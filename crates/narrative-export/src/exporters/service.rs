/*
 * service.rs
 * Copyright (c) 2025 Posit, PBC
 */

use super::{
    ExportFormat, ExportObjectResult, JsonExporter, LanguageExporter, ObjectExporter,
    ScriptExporter,
};
use crate::error::ExportError;
use crate::model::{ExportObjectData, ExportTemplate};
use crate::store::{ProjectStore, TemplateStore};
use std::sync::Arc;

/// Entry point selecting the exporter for a format.
#[derive(Clone)]
pub struct ExportService {
    script: ScriptExporter,
}

impl ExportService {
    pub fn new(templates: Arc<dyn TemplateStore>, projects: Arc<dyn ProjectStore>) -> Self {
        Self {
            script: ScriptExporter::new(templates, projects),
        }
    }

    pub fn exporter(&self, format: ExportFormat) -> Box<dyn ObjectExporter> {
        match format {
            ExportFormat::Script => Box::new(self.script.clone()),
            ExportFormat::Json => Box::new(JsonExporter),
            ExportFormat::LanguageFile => Box::new(LanguageExporter::new(self.script.clone())),
        }
    }

    pub async fn export(
        &self,
        format: ExportFormat,
        template: Option<&ExportTemplate>,
        data: &ExportObjectData,
    ) -> Result<ExportObjectResult, ExportError> {
        let object_id = data.object.base().id.as_str();
        let result = self.exporter(format).export(template, data).await;
        match &result {
            Ok(result) => tracing::info!(
                %format,
                object = object_id,
                diagnostics = result.errors.len(),
                has_errors = result.has_errors(),
                "export finished"
            ),
            Err(err) => tracing::warn!(%format, object = object_id, error = %err, "export failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ExportDialog, ExportDialogStep, ExportObject, ExportSettings, FlexFieldObject, Npc,
        Project, StepContent,
    };
    use crate::store::{MemoryTemplateStore, StaticProjectStore};
    use pretty_assertions::assert_eq;

    fn service() -> ExportService {
        ExportService::new(
            Arc::new(MemoryTemplateStore::new()),
            Arc::new(StaticProjectStore::new(Project::new("p1", "Demo"), ExportSettings::default())),
        )
    }

    #[tokio::test]
    async fn test_xss_aborts_every_format() {
        let data = ExportObjectData::new(ExportObject::Npc(Npc {
            base: FlexFieldObject::new("npc-1", "Grom"),
            ..Default::default()
        }))
        .with_dialog(ExportDialog {
            id: "d1".into(),
            steps: vec![ExportDialogStep::new(
                "s1",
                StepContent::NpcText {
                    text: "<script>alert(1)</script>".into(),
                },
            )],
        });

        for format in [ExportFormat::Script, ExportFormat::Json, ExportFormat::LanguageFile] {
            let err = service().export(format, None, &data).await.unwrap_err();
            assert_eq!(err.to_string(), "Possible cross-site scripting in dialog step `s1`");
        }
    }

    #[tokio::test]
    async fn test_default_npc_template_with_dialog() {
        let data = ExportObjectData::new(ExportObject::Npc(Npc {
            base: FlexFieldObject::new("npc-1", "Grom"),
            ..Default::default()
        }))
        .with_dialog(ExportDialog {
            id: "d1".into(),
            steps: vec![
                ExportDialogStep::new("greet", StepContent::NpcText { text: "Hello".into() }).with_next("bye"),
                ExportDialogStep::new("bye", StepContent::PlayerText { text: "Bye".into() }),
            ],
        });

        let result = service().export(ExportFormat::Script, None, &data).await.unwrap();

        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(
            result.code,
            concat!(
                "-- Grom\n",
                "local npc = NewNpc(\"npc-1\")\n",
                "npc.name = Localize(\"L_npc_1_name\")\n",
                "npc.is_player = false\n",
                "\n",
                "function Step_greet()\n",
                "    NpcSay(Localize(\"L_greet_text\"))\n",
                "    return Step_bye()\n",
                "end\n",
                "function Step_bye()\n",
                "    PlayerSay(Localize(\"L_bye_text\"))\n",
                "end\n",
                "\n",
                "npc.dialog = Step_greet\n",
                "return npc\n",
            )
        );

        // Dialog keys are recorded while the dialog renders, before the object template.
        let language = service().export(ExportFormat::LanguageFile, None, &data).await.unwrap();
        assert_eq!(
            language.code,
            "L_greet_text = \"Hello\"\nL_bye_text = \"Bye\"\nL_npc_1_name = \"Grom\"\n"
        );
    }
}
