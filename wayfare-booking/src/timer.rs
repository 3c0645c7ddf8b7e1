use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use wayfare_core::store::{SessionKey, SessionStore};

use crate::events::EngineEvent;

/// The fields the cleanup task needs; parses any session payload.
#[derive(Deserialize)]
struct ExpiryProbe {
    session_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// One volatile timer per active session, re-armed on start/restore and
/// cleared on cancel/expiry/finalize. Purely a proactive-cleanup hint: the
/// lazy expiry check on every read remains the authority, so a timer lost to
/// a process restart costs nothing.
#[derive(Default)]
pub(crate) struct ExpiryTimers {
    handles: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl ExpiryTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(
        &self,
        key: &SessionKey,
        expires_at: DateTime<Utc>,
        store: Arc<dyn SessionStore>,
        events: broadcast::Sender<EngineEvent>,
    ) {
        let storage_key = key.storage_key();
        let key = key.clone();
        let delay = (expires_at - Utc::now()).to_std().unwrap_or_default();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Re-read before deleting: the slot may hold a newer session.
            if let Ok(Some(payload)) = store.get(&key).await {
                if let Ok(probe) = serde_json::from_str::<ExpiryProbe>(&payload) {
                    if Utc::now() > probe.expires_at && store.delete(&key).await.is_ok() {
                        info!(key = %key.storage_key(), "session expired, cleared proactively");
                        let _ = events.send(EngineEvent::SessionExpired {
                            kind: key.kind,
                            tenant: key.tenant.clone(),
                            session_id: probe.session_id,
                        });
                    }
                }
            }
        });

        let mut handles = self.handles.lock();
        if let Some(previous) = handles.insert(storage_key, handle) {
            previous.abort();
        }
    }

    pub fn clear(&self, key: &SessionKey) {
        if let Some(handle) = self.handles.lock().remove(&key.storage_key()) {
            handle.abort();
        }
    }
}
