use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};
use crate::storage::{validate_key, Storage};

/// JSON files under a root directory, one file per key path.
#[derive(Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn build_path(&self, keys: &[&str]) -> Result<PathBuf> {
        if keys.is_empty() {
            return Err(DashboardError::InvalidInput(
                "storage keys empty".to_string(),
            ));
        }
        let mut path = self.root.clone();
        for key in &keys[..keys.len() - 1] {
            validate_key(key)?;
            path.push(key);
        }
        let mut filename = keys[keys.len() - 1].to_string();
        validate_key(&filename)?;
        if !filename.ends_with(".json") {
            filename.push_str(".json");
        }
        path.push(filename);
        Ok(path)
    }

    fn build_dir(&self, keys: &[&str]) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for key in keys {
            validate_key(key)?;
            path.push(key);
        }
        Ok(path)
    }

    async fn ensure_parent_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                DashboardError::Storage(format!(
                    "failed to create storage directory {}: {error}",
                    parent.display()
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn write(&self, keys: &[&str], data: &Value) -> Result<()> {
        let path = self.build_path(keys)?;
        Self::ensure_parent_dir(&path).await?;
        let serialized = serde_json::to_vec_pretty(data)
            .map_err(|error| DashboardError::Storage(format!("storage serialize error: {error}")))?;
        tokio::fs::write(&path, serialized).await.map_err(|error| {
            DashboardError::Storage(format!(
                "failed to write storage file {}: {error}",
                path.display()
            ))
        })?;
        Ok(())
    }

    async fn read(&self, keys: &[&str]) -> Result<Option<Value>> {
        let path = self.build_path(keys)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(DashboardError::Storage(format!(
                    "failed to read storage file {}: {error}",
                    path.display()
                )))
            }
        };
        let value = serde_json::from_slice(&bytes)
            .map_err(|error| DashboardError::Storage(format!("storage parse error: {error}")))?;
        Ok(Some(value))
    }

    async fn list(&self, keys: &[&str]) -> Result<Vec<String>> {
        let dir = self.build_dir(keys)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => {
                return Err(DashboardError::Storage(format!(
                    "failed to list storage directory {}: {error}",
                    dir.display()
                )))
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|error| {
            DashboardError::Storage(format!("failed to read storage entry: {error}"))
        })? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            match name.strip_suffix(".json") {
                Some(stem) => names.push(stem.to_string()),
                None => names.push(name.to_string()),
            }
        }
        names.sort();
        Ok(names)
    }
}
