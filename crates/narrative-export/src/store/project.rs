/*
 * project.rs
 * Copyright (c) 2025 Posit, PBC
 */

use super::{ProjectStore, StoreError, StoreResult};
use crate::model::{ExportSettings, Project};
use async_trait::async_trait;

/// A single project with fixed export settings.
///
/// The project is both the default project and the user's project, which
/// is what a command line export needs.
#[derive(Debug, Clone)]
pub struct StaticProjectStore {
    project: Project,
    settings: ExportSettings,
}

impl StaticProjectStore {
    pub fn new(project: Project, settings: ExportSettings) -> Self {
        Self { project, settings }
    }
}

#[async_trait]
impl ProjectStore for StaticProjectStore {
    async fn get_default_project(&self) -> StoreResult<Project> {
        Ok(self.project.clone())
    }

    async fn get_user_project(&self) -> StoreResult<Project> {
        Ok(self.project.clone())
    }

    async fn get_export_settings(&self, project_id: &str) -> StoreResult<ExportSettings> {
        if project_id != self.project.id {
            return Err(StoreError::ProjectNotFound(project_id.to_string()));
        }
        Ok(self.settings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settings_only_for_own_project() {
        let store = StaticProjectStore::new(Project::new("p1", "Demo"), ExportSettings::default());

        assert_eq!(store.get_user_project().await.unwrap().id, "p1");
        assert_eq!(store.get_export_settings("p1").await.unwrap().script_extension, "lua");
        assert_eq!(
            store.get_export_settings("p2").await.unwrap_err().to_string(),
            "project `p2` not found"
        );
    }
}
