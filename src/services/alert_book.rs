use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{errors::StoreError, models::AlertSet};

use super::alert_store::AlertStore;

/// Serializes every read-modify-write against the store so the chat path and
/// the monitor can't overwrite each other's changes.
#[derive(Clone)]
pub struct AlertBook {
    store: Arc<dyn AlertStore>,
    write_lock: Arc<Mutex<()>>,
}

impl AlertBook {
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn snapshot(&self) -> Result<AlertSet, StoreError> {
        let _guard = self.write_lock.lock().await;
        self.store.load().await
    }

    /// Loads, applies `f`, and saves. Nothing is written when `f` fails.
    pub async fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut AlertSet) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.write_lock.lock().await;

        let mut alerts = self.store.load().await?;
        let out = f(&mut alerts)?;
        self.store.save(&alerts).await?;

        Ok(out)
    }
}
