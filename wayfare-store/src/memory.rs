use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use wayfare_core::store::{SessionKey, SessionStore, StoreError};

struct Entry {
    payload: String,
    deadline: Option<Instant>,
}

/// In-memory session store for tests and single-process development runs.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn put(&self, key: &SessionKey, payload: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.storage_key(),
            Entry {
                payload: payload.to_string(),
                deadline: Instant::now().checked_add(ttl),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &SessionKey) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().await;
        let storage_key = key.storage_key();
        if let Some(entry) = entries.get(&storage_key) {
            if entry.deadline.is_some_and(|d| d <= Instant::now()) {
                entries.remove(&storage_key);
                return Ok(None);
            }
            return Ok(Some(entry.payload.clone()));
        }
        Ok(None)
    }

    async fn delete(&self, key: &SessionKey) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.remove(&key.storage_key());
        Ok(())
    }
}
