use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wayfare_core::money::Price;
use wayfare_core::resource::BookableResource;

/// Fixed for every session kind; never extended by activity.
pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Details,
    GuestDetails,
    Payment,
    Confirming,
    Confirmed,
    Cancelled,
    Expired,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Confirmed | SessionStatus::Cancelled | SessionStatus::Expired
        )
    }

    /// Position in the booking pipeline, for picking the earliest incomplete
    /// stage across a combined session's legs.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            SessionStatus::Details => 0,
            SessionStatus::GuestDetails => 1,
            SessionStatus::Payment => 2,
            SessionStatus::Confirming => 3,
            SessionStatus::Confirmed => 4,
            SessionStatus::Cancelled | SessionStatus::Expired => 5,
        }
    }
}

/// Outcome of a successful price revalidation, kept on the session so the
/// finalize step can prove one happened and use its lock code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevalidationResult {
    pub available: bool,
    pub price_changed: bool,
    pub original_price: Price,
    pub current_price: Price,
    /// Supersedes the session's previous lock code.
    pub lock_code: String,
    pub policy_changed: bool,
    pub synthetic: bool,
}

/// One in-progress booking transaction for a single resource type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct BookingSession<R: BookableResource> {
    pub session_id: Uuid,
    /// The selected inventory item, immutable once chosen.
    pub resource: R::Snapshot,
    /// The parameters that produced `resource`, immutable.
    pub criteria: R::Criteria,
    /// Always the most recently revalidated lock code; finalizing with the
    /// original snapshot's code risks booking at an invalidated price.
    pub lock_code: String,
    pub revalidation: Option<RevalidationResult>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl<R: BookableResource> BookingSession<R> {
    pub fn new(resource: R::Snapshot, criteria: R::Criteria, ttl: Duration) -> Self {
        let now = Utc::now();
        let lock_code = R::lock_code(&resource).to_string();
        Self {
            session_id: Uuid::new_v4(),
            resource,
            criteria,
            lock_code,
            revalidation: None,
            status: SessionStatus::Details,
            created_at: now,
            expires_at: now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero()),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn quoted_price(&self) -> Price {
        R::quoted_price(&self.resource)
    }

    /// Most authoritative known price: revalidated if available, quoted
    /// otherwise.
    pub fn effective_price(&self) -> Price {
        self.revalidation
            .as_ref()
            .map(|r| r.current_price.clone())
            .unwrap_or_else(|| self.quoted_price())
    }

    pub(crate) fn remaining_ttl(&self) -> Duration {
        (self.expires_at - Utc::now()).to_std().unwrap_or_default()
    }
}
