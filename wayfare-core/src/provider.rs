use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::confirmation::ReservationRecord;
use crate::money::Price;
use crate::party::PaymentInfo;
use crate::resource::BookableResource;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider network error: {0}")]
    Network(String),

    #[error("provider request timed out after {0}ms")]
    Timeout(u64),

    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("provider response could not be decoded: {0}")]
    Decode(String),
}

/// Outcome of a price revalidation (pre-book) call. The engine derives the
/// changed/unchanged flag itself by comparing against the quoted price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevalidationOutcome {
    pub available: bool,
    pub current_price: Price,
    /// Supersedes the lock code the check was made with.
    pub lock_code: String,
    pub policy_changed: bool,
    pub synthetic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationOutcome {
    pub reference: String,
    pub status: String,
    pub cancelled_at: DateTime<Utc>,
    pub synthetic: bool,
}

/// Finalize request assembled by the session manager. `lock_code` is always
/// the most recently revalidated one, never the original snapshot's.
#[derive(Debug, Clone)]
pub struct ReservationRequest<R: BookableResource> {
    pub lock_code: String,
    pub details: R::Details,
    pub payment: PaymentInfo,
}

/// Request/response boundary to one inventory provider. Two independent
/// instances exist (flight, hotel) with structurally analogous but not
/// identical wire payloads; the fallback synthesizer implements the same
/// boundary so callers never branch on provider availability.
#[async_trait]
pub trait InventoryProvider<R: BookableResource>: Send + Sync {
    async fn search(&self, criteria: &R::Criteria) -> Result<Vec<R::Snapshot>, ProviderError>;

    /// Re-check price and availability for a priced offer immediately before
    /// finalize. `quoted` is the price shown at selection time; providers use
    /// it for fare verification.
    async fn price_revalidate(
        &self,
        lock_code: &str,
        quoted: &Price,
    ) -> Result<RevalidationOutcome, ProviderError>;

    async fn create_reservation(
        &self,
        request: &ReservationRequest<R>,
    ) -> Result<ReservationRecord, ProviderError>;

    async fn get_reservation(&self, reference: &str) -> Result<ReservationRecord, ProviderError>;

    async fn cancel_reservation(
        &self,
        reference: &str,
    ) -> Result<CancellationOutcome, ProviderError>;
}
