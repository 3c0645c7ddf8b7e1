use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use wayfare_core::store::{SessionKey, SessionStore, StoreError};

/// Redis-backed session store. The key TTL mirrors the session's own
/// `expires_at`, so abandoned sessions disappear from the backend even when
/// no process is alive to clean them up.
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    pub fn new(connection_string: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(connection_string)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for RedisStore {
    async fn put(&self, key: &SessionKey, payload: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let storage_key = key.storage_key();
        // A zero TTL would be rejected by SET EX; a session that close to
        // expiry is not worth persisting.
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(&storage_key, payload, seconds)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        debug!(key = %storage_key, ttl_seconds = seconds, "session persisted");
        Ok(())
    }

    async fn get(&self, key: &SessionKey) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection().await?;
        conn.get(key.storage_key())
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn delete(&self, key: &SessionKey) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key.storage_key())
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
