//! Catalog loading from the declarative per-stage sources.

use super::Task;
use crate::core::StageKind;
use crate::errors::CatalogError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads a stage's ordered task list from an external declarative source.
///
/// Implementations must preserve source order and filter out records with
/// `enable == false`; the returned order is exactly what observers display.
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    /// Loads the enabled tasks for one stage, in catalog order.
    async fn load(&self, stage: StageKind) -> Result<Vec<Task>, CatalogError>;
}

/// Reads task records from one JSON file per stage kind under a functions
/// directory.
#[derive(Debug, Clone)]
pub struct JsonCatalogLoader {
    functions_dir: PathBuf,
}

impl JsonCatalogLoader {
    /// Creates a loader rooted at the given functions directory.
    #[must_use]
    pub fn new(functions_dir: impl Into<PathBuf>) -> Self {
        Self {
            functions_dir: functions_dir.into(),
        }
    }

    /// The file backing one stage's catalog.
    #[must_use]
    pub fn catalog_path(&self, stage: StageKind) -> PathBuf {
        self.functions_dir.join(stage.catalog_file())
    }

    /// The root directory the loader reads from.
    #[must_use]
    pub fn functions_dir(&self) -> &Path {
        &self.functions_dir
    }
}

#[async_trait]
impl CatalogLoader for JsonCatalogLoader {
    async fn load(&self, stage: StageKind) -> Result<Vec<Task>, CatalogError> {
        let path = self.catalog_path(stage);
        let bytes = tokio::fs::read(&path).await?;
        let records: Vec<Task> = serde_json::from_slice(&bytes)?;

        let total = records.len();
        let tasks: Vec<Task> = records.into_iter().filter(|t| t.enabled).collect();
        debug!(
            stage = %stage,
            path = %path.display(),
            total,
            enabled = tasks.len(),
            "catalog loaded"
        );
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TaskKind;
    use pretty_assertions::assert_eq;

    fn write_catalog(dir: &Path, stage: StageKind, body: &str) {
        std::fs::write(dir.join(stage.catalog_file()), body).unwrap();
    }

    #[tokio::test]
    async fn test_load_preserves_order_and_filters_disabled() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(
            dir.path(),
            StageKind::ProgramInstall,
            r#"[
                {"id": 1, "name": "A", "enable": true, "kind": "shell_command", "template": "echo ok"},
                {"id": 2, "name": "B", "enable": false, "kind": "shell_command", "template": "echo no"},
                {"id": 3, "name": "C", "kind": "package_install", "ids": "pkg1,pkg2"}
            ]"#,
        );

        let loader = JsonCatalogLoader::new(dir.path());
        let tasks = loader.load(StageKind::ProgramInstall).await.unwrap();

        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(tasks[1].kind(), TaskKind::PackageInstall);
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let loader = JsonCatalogLoader::new(dir.path());

        let err = loader.load(StageKind::GroupPolicy).await.unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), StageKind::WindowsSettings, "{not json");

        let loader = JsonCatalogLoader::new(dir.path());
        let err = loader.load(StageKind::WindowsSettings).await.unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[test]
    fn test_catalog_path_per_stage() {
        let loader = JsonCatalogLoader::new("Functions");
        assert!(loader
            .catalog_path(StageKind::PythonDependencyInstall)
            .ends_with("PythonDependencies.json"));
    }
}
