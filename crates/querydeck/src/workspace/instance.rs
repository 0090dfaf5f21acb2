use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::workspace::config::{load_or_create_config, DashboardConfig};

/// Resolved workspace: directory, config, and the shared catalog handle.
///
/// The catalog is replaced wholesale on reload; readers take the lock for the
/// duration of one request only.
#[derive(Clone)]
pub struct WorkspaceInstance {
    pub workspace_dir: PathBuf,
    pub config: DashboardConfig,
    pub catalog: Arc<RwLock<Catalog>>,
}

impl fmt::Debug for WorkspaceInstance {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("WorkspaceInstance")
            .field("workspace_dir", &self.workspace_dir)
            .field("config", &self.config)
            .finish()
    }
}

impl WorkspaceInstance {
    pub fn load(workspace_dir: &Path) -> Result<Self> {
        let config = load_or_create_config(workspace_dir)?;
        Ok(Self {
            workspace_dir: workspace_dir.to_path_buf(),
            config,
            catalog: Arc::new(RwLock::new(Catalog::default())),
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.config.database)
    }

    pub fn sql_dir(&self) -> PathBuf {
        self.resolve(&self.config.sql_dir)
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.resolve(&self.config.docs_dir)
    }

    pub fn ui_dir(&self) -> PathBuf {
        self.resolve(&self.config.ui_dir)
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.workspace_dir.join("storage")
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_dir.join(path)
        }
    }
}
