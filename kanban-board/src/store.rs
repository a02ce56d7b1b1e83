//! Durable key-value stores for board state
//!
//! The gateway only needs `get`/`set` of JSON values under a string key.
//! [`FileStore`] keeps one JSON file per key, [`MemoryStore`] keeps values in
//! process, and [`LatencyStore`] delays every call to mimic a slow backend.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::sync::RwLock;

/// A key-value store holding JSON documents
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the value under `key`, `None` when absent
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the value under `key`
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// One pretty-printed JSON file per key under a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`
    pub fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid store key: {:?}", key),
            )
            .into());
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let path = self.key_path(key)?;
        let content = serde_json::to_string_pretty(&value)?;
        atomic_write(&path, content.as_bytes()).await
    }
}

/// Wraps a store and sleeps before every call
pub struct LatencyStore {
    inner: Arc<dyn StateStore>,
    latency: Duration,
}

impl LatencyStore {
    pub fn new(inner: Arc<dyn StateStore>, latency: Duration) -> Self {
        Self { inner, latency }
    }
}

#[async_trait]
impl StateStore for LatencyStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        tokio::time::sleep(self.latency).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        self.inner.set(key, value).await
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}
