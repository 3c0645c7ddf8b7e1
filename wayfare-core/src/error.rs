use thiserror::Error;

use crate::provider::ProviderError;
use crate::store::{SessionKind, StoreError};

/// Engine error taxonomy. Search and revalidation provider failures never
/// reach callers (the fallback synthesizer substitutes for them); `Provider`
/// therefore only surfaces from finalize, where fabricating a confirmation
/// would be worse than the failure.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("no active {0}")]
    NoActiveSession(SessionKind),

    #[error("session expired")]
    SessionExpired,

    #[error("price revalidation required before finalize")]
    RevalidationRequired,

    #[error("selected offer is no longer available")]
    ResourceUnavailable,

    #[error("provider reservation call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("session store failure: {0}")]
    Store(#[from] StoreError),
}

pub type BookingResult<T> = Result<T, BookingError>;
