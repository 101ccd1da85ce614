use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{errors::StoreError, models::AlertSet};

/// Durable home of the alert set. Whole-document load and save only.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Empty set when nothing has been saved yet.
    async fn load(&self) -> Result<AlertSet, StoreError>;

    /// Full overwrite.
    async fn save(&self, alerts: &AlertSet) -> Result<(), StoreError>;
}

/// Pretty-printed JSON file, e.g. `prices.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl AlertStore for JsonFileStore {
    async fn load(&self) -> Result<AlertSet, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AlertSet::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(AlertSet::new());
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, alerts: &AlertSet) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(alerts)?;

        // write next to the target, then rename over it
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}

/// In-process store, nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<AlertSet>,
}

impl MemoryStore {
    pub fn new(initial: AlertSet) -> Self {
        Self {
            inner: Mutex::new(initial),
        }
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn load(&self) -> Result<AlertSet, StoreError> {
        Ok(self.inner.lock().await.clone())
    }

    async fn save(&self, alerts: &AlertSet) -> Result<(), StoreError> {
        *self.inner.lock().await = alerts.clone();
        Ok(())
    }
}
