use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::criteria::{FlightSearchCriteria, HotelSearchCriteria, TravelWindow};
use crate::error::BookingError;
use crate::money::Price;
use crate::offer::{FlightOffer, HotelOffer};
use crate::party::{FlightDetails, HotelDetails};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    Flight,
    Hotel,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Flight => write!(f, "flight"),
            ResourceKind::Hotel => write!(f, "hotel"),
        }
    }
}

/// Binds the per-resource payload types together so one session manager can
/// drive both booking pipelines. The flight and hotel transactions have the
/// same shape; only the payloads differ.
pub trait BookableResource: Send + Sync + 'static {
    const KIND: ResourceKind;

    type Criteria: Serialize + DeserializeOwned + Clone + Send + Sync + std::fmt::Debug;
    type Snapshot: Serialize + DeserializeOwned + Clone + Send + Sync + std::fmt::Debug;
    type Details: Clone + Send + Sync + std::fmt::Debug;

    /// The provider token identifying the priced offer at selection time.
    fn lock_code(snapshot: &Self::Snapshot) -> &str;
    /// The price quoted at selection time.
    fn quoted_price(snapshot: &Self::Snapshot) -> Price;
    fn is_synthetic(snapshot: &Self::Snapshot) -> bool;
    fn validate_criteria(criteria: &Self::Criteria) -> Result<(), BookingError>;
    fn validate_details(details: &Self::Details) -> Result<(), BookingError>;
    fn party_names(details: &Self::Details) -> Vec<String>;
    /// Calendar span the finalized booking is filed against.
    fn travel_window(criteria: &Self::Criteria) -> TravelWindow;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightResource;

impl BookableResource for FlightResource {
    const KIND: ResourceKind = ResourceKind::Flight;

    type Criteria = FlightSearchCriteria;
    type Snapshot = FlightOffer;
    type Details = FlightDetails;

    fn lock_code(snapshot: &FlightOffer) -> &str {
        &snapshot.fare_key
    }

    fn quoted_price(snapshot: &FlightOffer) -> Price {
        snapshot.offered_fare.clone()
    }

    fn is_synthetic(snapshot: &FlightOffer) -> bool {
        snapshot.synthetic
    }

    fn validate_criteria(criteria: &FlightSearchCriteria) -> Result<(), BookingError> {
        criteria.validate()
    }

    fn validate_details(details: &FlightDetails) -> Result<(), BookingError> {
        details.validate()
    }

    fn party_names(details: &FlightDetails) -> Vec<String> {
        details.names()
    }

    fn travel_window(criteria: &FlightSearchCriteria) -> TravelWindow {
        TravelWindow {
            start: criteria.departure_date,
            end: criteria.return_date.unwrap_or(criteria.departure_date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotelResource;

impl BookableResource for HotelResource {
    const KIND: ResourceKind = ResourceKind::Hotel;

    type Criteria = HotelSearchCriteria;
    type Snapshot = HotelOffer;
    type Details = HotelDetails;

    fn lock_code(snapshot: &HotelOffer) -> &str {
        &snapshot.rate_key
    }

    fn quoted_price(snapshot: &HotelOffer) -> Price {
        snapshot.total_rate.clone()
    }

    fn is_synthetic(snapshot: &HotelOffer) -> bool {
        snapshot.synthetic
    }

    fn validate_criteria(criteria: &HotelSearchCriteria) -> Result<(), BookingError> {
        criteria.validate()
    }

    fn validate_details(details: &HotelDetails) -> Result<(), BookingError> {
        details.validate()
    }

    fn party_names(details: &HotelDetails) -> Vec<String> {
        details.names()
    }

    fn travel_window(criteria: &HotelSearchCriteria) -> TravelWindow {
        TravelWindow {
            start: criteria.check_in,
            end: criteria.check_out,
        }
    }
}
