use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{DashboardError, Result};
use crate::storage::{validate_key, Storage};

/// In-memory storage for tests; mirrors the key semantics of `FileStorage`.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<Vec<String>, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate_keys(keys: &[&str]) -> Result<Vec<String>> {
    if keys.is_empty() {
        return Err(DashboardError::InvalidInput(
            "storage keys empty".to_string(),
        ));
    }
    for key in keys {
        validate_key(key)?;
    }
    Ok(keys.iter().map(ToString::to_string).collect())
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn write(&self, keys: &[&str], data: &Value) -> Result<()> {
        let keys = validate_keys(keys)?;
        self.entries.write().await.insert(keys, data.clone());
        Ok(())
    }

    async fn read(&self, keys: &[&str]) -> Result<Option<Value>> {
        let keys = validate_keys(keys)?;
        Ok(self.entries.read().await.get(&keys).cloned())
    }

    async fn list(&self, keys: &[&str]) -> Result<Vec<String>> {
        let prefix: Vec<String> = keys.iter().map(ToString::to_string).collect();
        let entries = self.entries.read().await;
        let mut names: Vec<String> = entries
            .keys()
            .filter(|stored| stored.len() == prefix.len() + 1 && stored.starts_with(&prefix))
            .filter_map(|stored| stored.last().cloned())
            .collect();
        names.sort();
        Ok(names)
    }
}
