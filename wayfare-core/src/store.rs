use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resource::ResourceKind;

/// Caller-supplied identifier scoping sessions; at most one active session
/// exists per (tenant, session kind).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionKind {
    Flight,
    Hotel,
    Combined,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Flight => "flight_session",
            SessionKind::Hotel => "hotel_session",
            SessionKind::Combined => "combined_session",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ResourceKind> for SessionKind {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Flight => SessionKind::Flight,
            ResourceKind::Hotel => SessionKind::Hotel,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub tenant: TenantId,
    pub kind: SessionKind,
}

impl SessionKey {
    pub fn new(tenant: TenantId, kind: SessionKind) -> Self {
        Self { tenant, kind }
    }

    pub fn storage_key(&self) -> String {
        format!("session:{}:{}", self.tenant, self.kind)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("session store backend error: {0}")]
    Backend(String),

    #[error("session payload could not be serialized: {0}")]
    Serialization(String),
}

/// Durable session store boundary: one serialized session per key, written
/// with the session's remaining TTL. Timestamps inside the payload are
/// ISO-8601; a payload that fails to parse on read is treated as no session
/// by the caller, which then clears the key.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn put(&self, key: &SessionKey, payload: &str, ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, key: &SessionKey) -> Result<Option<String>, StoreError>;

    async fn delete(&self, key: &SessionKey) -> Result<(), StoreError>;
}
