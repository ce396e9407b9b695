//! narrative-export CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use narrative_export::ExportFormat;
use narrative_export::model::{RenderingEngine, TemplateType};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "narrative-export")]
#[command(version, about = "Export game narrative data through project templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineArg {
    Template,
    Legacy,
}

impl From<EngineArg> for RenderingEngine {
    fn from(engine: EngineArg) -> Self {
        match engine {
            EngineArg::Template => RenderingEngine::Template,
            EngineArg::Legacy => RenderingEngine::Legacy,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Export one object as a script, JSON or language file
    Export {
        /// Project file (YAML)
        #[arg(short, long)]
        project: PathBuf,

        /// Object to export (JSON)
        #[arg(long)]
        object: PathBuf,

        /// Output format: script, json or language
        #[arg(short, long, default_value = "script")]
        format: ExportFormat,

        /// Use this template instead of the project's template for the object type
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Engine interpreting --template
        #[arg(long, value_enum, default_value = "template")]
        engine: EngineArg,

        /// Write output to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the whole result, including diagnostics, as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the placeholders a template type can use
    Placeholders {
        /// Template type, e.g. object_npc or condition_value_field
        #[arg(short = 't', long = "type")]
        template_type: TemplateType,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "narrative_export=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            project,
            object,
            format,
            template,
            engine,
            output,
            json,
        } => commands::export::execute(commands::export::ExportArgs {
            project,
            object,
            format,
            template,
            engine: engine.into(),
            output,
            json,
        }),
        Commands::Placeholders {
            template_type,
            json,
        } => commands::placeholders::execute(template_type, json),
    }
}
