use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Price;
use crate::resource::ResourceKind;

/// What a provider's finalize/retrieve endpoint hands back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub confirmation_number: String,
    pub provider_reference: String,
    pub provider_status: String,
    pub voucher_reference: Option<String>,
    pub synthetic: bool,
}

/// The immutable output of a completed booking. Produced once, handed to the
/// itinerary recorder and to the caller; never held in session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub confirmation_number: String,
    pub provider_reference: String,
    pub kind: ResourceKind,
    pub party: Vec<String>,
    pub total: Price,
    pub booked_at: DateTime<Utc>,
    pub provider_status: String,
    pub voucher_reference: Option<String>,
    pub synthetic: bool,
}
