pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{DashboardError, Result};

#[async_trait]
pub trait Storage: Send + Sync {
    async fn write(&self, keys: &[&str], data: &Value) -> Result<()>;
    async fn read(&self, keys: &[&str]) -> Result<Option<Value>>;
    async fn list(&self, keys: &[&str]) -> Result<Vec<String>>;
}

pub type SharedStorage = Arc<dyn Storage>;

pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key == "." || key == ".." {
        return Err(DashboardError::InvalidInput(format!(
            "invalid storage key {key}"
        )));
    }
    if key.contains('/') || key.contains('\\') {
        return Err(DashboardError::InvalidInput(format!(
            "invalid storage key {key}"
        )));
    }
    Ok(())
}
