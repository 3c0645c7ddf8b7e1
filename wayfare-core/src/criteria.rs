use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::BookingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

/// Parameters that produced a flight offer. Immutable once a session starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSearchCriteria {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub cabin_class: CabinClass,
}

impl FlightSearchCriteria {
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(BookingError::Validation(
                "origin and destination are required".to_string(),
            ));
        }
        if self.origin == self.destination {
            return Err(BookingError::Validation(
                "origin and destination must differ".to_string(),
            ));
        }
        if self.adults == 0 {
            return Err(BookingError::Validation(
                "at least one adult passenger is required".to_string(),
            ));
        }
        if let Some(return_date) = self.return_date {
            if return_date < self.departure_date {
                return Err(BookingError::Validation(
                    "return date precedes departure date".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Parameters that produced a hotel offer. Immutable once a session starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelSearchCriteria {
    pub city_code: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub rooms: u32,
    pub adults: u32,
    pub children: u32,
}

impl HotelSearchCriteria {
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.city_code.trim().is_empty() {
            return Err(BookingError::Validation("city code is required".to_string()));
        }
        if self.rooms == 0 {
            return Err(BookingError::Validation(
                "at least one room is required".to_string(),
            ));
        }
        if self.adults == 0 {
            return Err(BookingError::Validation(
                "at least one adult guest is required".to_string(),
            ));
        }
        if self.check_out <= self.check_in {
            return Err(BookingError::Validation(
                "check-out must be after check-in".to_string(),
            ));
        }
        Ok(())
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Calendar span a finalized booking is filed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}
