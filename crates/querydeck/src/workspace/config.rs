use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};
use crate::utils::time::now_secs;

pub const DASHBOARD_CONFIG_FILENAME: &str = "querydeck.json";
pub const DASHBOARD_CONFIG_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub version: String,
    pub name: String,
    pub created_at: u64,
    pub last_modified: u64,
    /// SQLite database file; relative paths resolve against the workspace.
    pub database: PathBuf,
    pub sql_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub ui_dir: PathBuf,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl DashboardConfig {
    pub fn default_new() -> Self {
        let now = now_secs();
        Self {
            version: DASHBOARD_CONFIG_VERSION.to_string(),
            name: "Query Dashboard".to_string(),
            created_at: now,
            last_modified: now,
            database: PathBuf::from("dashboard.db"),
            sql_dir: PathBuf::from("sql"),
            docs_dir: PathBuf::from("docs"),
            ui_dir: PathBuf::from("ui"),
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
        }
    }
}

pub fn load_or_create_config(dir: &Path) -> Result<DashboardConfig> {
    std::fs::create_dir_all(dir).map_err(|error| {
        DashboardError::Config(format!(
            "failed to create workspace directory {}: {error}",
            dir.display()
        ))
    })?;

    let path = config_path(dir);
    if !path.exists() {
        let config = DashboardConfig::default_new();
        write_config(&path, &config)?;
        return Ok(config);
    }

    let data = std::fs::read_to_string(&path).map_err(|error| {
        DashboardError::Config(format!(
            "failed to read dashboard config {}: {error}",
            path.display()
        ))
    })?;
    let mut config: DashboardConfig = serde_json::from_str(&data).map_err(|error| {
        DashboardError::Config(format!(
            "failed to parse dashboard config {}: {error}",
            path.display()
        ))
    })?;

    if config.version != DASHBOARD_CONFIG_VERSION {
        config = migrate_config(config)?;
        write_config(&path, &config)?;
    }

    Ok(config)
}

pub fn migrate_config(_config: DashboardConfig) -> Result<DashboardConfig> {
    Err(DashboardError::NotImplemented)
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(DASHBOARD_CONFIG_FILENAME)
}

fn write_config(path: &Path, config: &DashboardConfig) -> Result<()> {
    let mut config = config.clone();
    config.last_modified = now_secs();
    let data = serde_json::to_string_pretty(&config).map_err(|error| {
        DashboardError::Config(format!(
            "failed to serialize dashboard config {}: {error}",
            path.display()
        ))
    })?;
    std::fs::write(path, data).map_err(|error| {
        DashboardError::Config(format!(
            "failed to write dashboard config {}: {error}",
            path.display()
        ))
    })?;
    Ok(())
}
