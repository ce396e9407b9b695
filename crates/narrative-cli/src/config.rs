//! Project files.
//!
//! ```yaml
//! project: { id: "p1", name: "Demo" }
//! settings: { script_extension: "lua", dialect: lua }
//! templates_dir: templates
//! ```

use anyhow::{Context, Result};
use narrative_export::model::{ExportSettings, Project};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    pub project: Project,
    #[serde(default)]
    pub settings: ExportSettings,
    /// Template directory, relative to the project file.
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid project file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Template directory resolved against the directory of `project_file`.
    pub fn templates_dir(&self, project_file: &Path) -> Option<PathBuf> {
        let dir = self.templates_dir.as_ref()?;
        let base = project_file.parent().unwrap_or_else(|| Path::new(""));
        Some(base.join(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrative_export::conditions::DialectPreset;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_with_defaults() {
        let config = ProjectConfig::parse(
            "project: { id: p1, name: Demo }\nsettings: { dialect: c_like }\ntemplates_dir: templates\n",
        )
        .unwrap();

        assert_eq!(config.project.id, "p1");
        assert_eq!(config.settings.dialect, DialectPreset::CLike);
        assert_eq!(config.settings.script_extension, "lua");
        assert_eq!(
            config.templates_dir(Path::new("game/project.yml")),
            Some(PathBuf::from("game/templates"))
        );
    }

    #[test]
    fn test_settings_are_optional() {
        let config = ProjectConfig::parse("project: { id: p1, name: Demo }\n").unwrap();
        assert_eq!(config.settings, ExportSettings::default());
        assert_eq!(config.templates_dir(Path::new("project.yml")), None);
    }

    #[test]
    fn test_load_fixture_project() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../narrative-export/test-fixtures/project.yml");
        let config = ProjectConfig::load(&path).unwrap();

        assert_eq!(config.project.name, "Demo");
        assert!(config.templates_dir(&path).unwrap().join("object_npc.template").exists());
    }

    #[test]
    fn test_missing_project_file_names_the_path() {
        let err = ProjectConfig::load(Path::new("no/such/project.yml")).unwrap_err();
        assert!(err.to_string().contains("no/such/project.yml"));
    }
}
