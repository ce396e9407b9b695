/*
 * renderer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Filling export templates with object data.
//!
//! One [`PlaceholderResolver::fill_placeholders`] call is one render: a
//! single [`EvalContext`] is shared by the object template, the dialog
//! template, every condition and action snippet and all includes. Includes
//! are therefore cached across all of them, and language keys recorded by
//! any of them are returned together.

use crate::adapter::object_value;
use crate::conditions::NodeRenderer;
use crate::dialog_adapter::dialog_value;
use crate::errors::ExportPlaceholderErrorCollection;
use crate::model::{
    EXPORT_DATA_DIALOG, EXPORT_DATA_LANGUAGE_KEYS, EXPORT_DATA_OBJECT, ExportObjectData,
    ExportSettings, ExportTemplate, RenderingEngine, TemplateType,
};
use crate::store::{StoreIncludeResolver, TemplateStore};
use narrative_template::{
    EvalContext, LanguageKey, LanguageKeyGenerator, TemplateContext, TemplateValue,
    fill_legacy_placeholders, render_source,
};

/// Render `code` with the given engine.
///
/// `name` identifies the code in diagnostic spans.
pub async fn render_code(
    code: &str,
    name: &str,
    engine: RenderingEngine,
    vars: &TemplateContext,
    ctx: &mut EvalContext<'_>,
) -> String {
    match engine {
        RenderingEngine::Template => render_source(code, name, vars, ctx).await,
        RenderingEngine::Legacy => fill_legacy_placeholders(code, name, vars, ctx),
    }
}

/// Filled template text plus the language keys generated on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    pub code: String,
    pub language_keys: Vec<LanguageKey>,
}

/// Renders templates of one project.
pub struct PlaceholderResolver<'a> {
    templates: &'a dyn TemplateStore,
    project_id: &'a str,
    settings: &'a ExportSettings,
}

impl<'a> PlaceholderResolver<'a> {
    pub fn new(templates: &'a dyn TemplateStore, project_id: &'a str, settings: &'a ExportSettings) -> Self {
        Self {
            templates,
            project_id,
            settings,
        }
    }

    fn context<'c>(
        &self,
        errors: &'c mut ExportPlaceholderErrorCollection,
        resolver: &'c StoreIncludeResolver<'_>,
    ) -> EvalContext<'c> {
        EvalContext::new(errors.collector_mut(), resolver)
            .with_strict_mode(self.settings.strict_mode)
            .with_max_include_depth(self.settings.max_include_depth)
    }

    /// Fill `template` with `data`.
    ///
    /// `language_keys` enables the `langkey` pipe. Every problem is recorded
    /// in `errors`; the returned code is whatever could be rendered.
    pub async fn fill_placeholders(
        &self,
        template: &ExportTemplate,
        data: &ExportObjectData,
        language_keys: Option<&dyn LanguageKeyGenerator>,
        errors: &mut ExportPlaceholderErrorCollection,
    ) -> RenderOutput {
        let resolver = StoreIncludeResolver::new(self.templates, self.project_id);
        let mut ctx = self.context(errors, &resolver);
        if let Some(generator) = language_keys {
            ctx = ctx.with_language_key_generator(generator);
        }
        let mut nodes = NodeRenderer::new(self.templates, self.project_id, self.settings.dialect.dialect());

        let object = object_value(&data.object, &mut nodes, &mut ctx).await;
        let dialog = match &data.dialog {
            Some(dialog) => {
                let mut value = dialog_value(dialog, Some(data.object.base()), &mut nodes, &mut ctx).await;
                let code = self.render_dialog(&object, &value, &mut nodes, &mut ctx).await;
                if let TemplateValue::Map(members) = &mut value {
                    members.insert("code".into(), code.into());
                }
                value
            }
            None => TemplateValue::Null,
        };

        let vars = TemplateContext::new()
            .with(EXPORT_DATA_OBJECT, object)
            .with(EXPORT_DATA_DIALOG, dialog);
        let code = render_code(
            &template.code,
            template.template_type.name(),
            template.rendering_engine,
            &vars,
            &mut ctx,
        )
        .await;

        tracing::debug!(
            template = %template.id,
            object = %data.object.base().id,
            language_keys = ctx.language_keys().len(),
            "filled export template"
        );
        RenderOutput {
            code,
            language_keys: ctx.into_language_keys(),
        }
    }

    /// Output of the project's dialog template, empty when it is missing.
    async fn render_dialog(
        &self,
        object: &TemplateValue,
        dialog: &TemplateValue,
        nodes: &mut NodeRenderer<'_>,
        ctx: &mut EvalContext<'_>,
    ) -> String {
        let Some(template) = nodes.template(TemplateType::Dialog, ctx).await else {
            return String::new();
        };
        let vars = TemplateContext::new()
            .with(EXPORT_DATA_OBJECT, object.clone())
            .with(EXPORT_DATA_DIALOG, dialog.clone());
        render_code(
            &template.code,
            TemplateType::Dialog.name(),
            template.rendering_engine,
            &vars,
            ctx,
        )
        .await
    }

    /// Fill a language file template with recorded language keys.
    pub async fn fill_language_file(
        &self,
        template: &ExportTemplate,
        language_keys: &[LanguageKey],
        errors: &mut ExportPlaceholderErrorCollection,
    ) -> String {
        let resolver = StoreIncludeResolver::new(self.templates, self.project_id);
        let mut ctx = self.context(errors, &resolver);
        let entries: Vec<TemplateValue> = language_keys
            .iter()
            .map(|entry| {
                TemplateValue::map([
                    ("key", entry.key.as_str().into()),
                    ("value", entry.value.as_str().into()),
                ])
            })
            .collect();
        let vars = TemplateContext::new().with(EXPORT_DATA_LANGUAGE_KEYS, entries.into());
        render_code(
            &template.code,
            template.template_type.name(),
            template.rendering_engine,
            &vars,
            &mut ctx,
        )
        .await
    }
}
