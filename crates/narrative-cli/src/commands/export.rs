//! Export command
//!
//! Exports one object of a project file and reports the diagnostics
//! recorded on the way.

use crate::config::ProjectConfig;
use anyhow::{Context, Result, bail};
use narrative_export::model::{ExportObjectData, ExportTemplate, RenderingEngine};
use narrative_export::store::{
    FileSystemTemplateStore, MemoryTemplateStore, StaticProjectStore, TemplateStore,
};
use narrative_export::{ExportFormat, ExportService};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the export command
#[derive(Debug)]
pub struct ExportArgs {
    pub project: PathBuf,
    pub object: PathBuf,
    pub format: ExportFormat,
    pub template: Option<PathBuf>,
    pub engine: RenderingEngine,
    pub output: Option<PathBuf>,
    pub json: bool,
}

/// Execute the export command
pub fn execute(args: ExportArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(args))
}

async fn run(args: ExportArgs) -> Result<()> {
    let config = ProjectConfig::load(&args.project)?;

    let content = tokio::fs::read_to_string(&args.object)
        .await
        .with_context(|| format!("Failed to read object file {}", args.object.display()))?;
    let data: ExportObjectData = serde_json::from_str(&content)
        .with_context(|| format!("Invalid object file {}", args.object.display()))?;

    let template = match &args.template {
        Some(path) => {
            let code = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read template {}", path.display()))?;
            Some(
                ExportTemplate::new(&config.project.id, data.object.template_type(), code)
                    .with_rendering_engine(args.engine),
            )
        }
        None => None,
    };

    let templates: Arc<dyn TemplateStore> = match config.templates_dir(&args.project) {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "using template directory");
            Arc::new(FileSystemTemplateStore::new(dir))
        }
        None => Arc::new(MemoryTemplateStore::new()),
    };
    let service = ExportService::new(
        templates,
        Arc::new(StaticProjectStore::new(config.project, config.settings)),
    );

    let result = match service.export(args.format, template.as_ref(), &data).await {
        Ok(result) => result,
        Err(err) => {
            eprintln!("{}", err.to_diagnostic().to_text(None));
            return Err(err.into());
        }
    };

    let output = if args.json {
        serde_json::to_string_pretty(&result)?
    } else {
        result.code.clone()
    };
    match &args.output {
        Some(path) => tokio::fs::write(path, &output)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            if !output.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }

    if !result.diagnostics().is_empty() {
        eprintln!("{}", result.diagnostics().render_text());
    }
    if result.has_errors() {
        bail!(
            "export of `{}` finished with errors",
            data.object.base().name
        );
    }
    Ok(())
}
