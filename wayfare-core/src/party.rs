use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::BookingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassengerType {
    Adult,
    Child,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Traveler {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub passenger_type: PassengerType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelGuest {
    pub first_name: String,
    pub last_name: String,
    pub age: Option<u8>,
}

/// Traveler manifest collected before a flight finalize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightDetails {
    pub travelers: Vec<Traveler>,
    pub contact_email: String,
}

impl FlightDetails {
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.travelers.is_empty() {
            return Err(BookingError::Validation(
                "at least one traveler is required".to_string(),
            ));
        }
        for traveler in &self.travelers {
            if traveler.first_name.trim().is_empty() || traveler.last_name.trim().is_empty() {
                return Err(BookingError::Validation(
                    "traveler first and last name are required".to_string(),
                ));
            }
        }
        validate_email(&self.contact_email)
    }

    pub fn names(&self) -> Vec<String> {
        self.travelers
            .iter()
            .map(|t| format!("{} {}", t.first_name, t.last_name))
            .collect()
    }
}

/// Guest manifest collected before a hotel finalize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelDetails {
    pub guests: Vec<HotelGuest>,
    pub contact_email: String,
}

impl HotelDetails {
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.guests.is_empty() {
            return Err(BookingError::Validation(
                "at least one guest is required".to_string(),
            ));
        }
        for guest in &self.guests {
            if guest.first_name.trim().is_empty() || guest.last_name.trim().is_empty() {
                return Err(BookingError::Validation(
                    "guest first and last name are required".to_string(),
                ));
            }
        }
        validate_email(&self.contact_email)
    }

    pub fn names(&self) -> Vec<String> {
        self.guests
            .iter()
            .map(|g| format!("{} {}", g.first_name, g.last_name))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub card_type: String,
    pub last_four: String,
    pub expiry: String,
    pub token: Option<String>,
}

impl PaymentInfo {
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.last_four.len() != 4 || !self.last_four.chars().all(|c| c.is_ascii_digit()) {
            return Err(BookingError::Validation(
                "payment card last four must be 4 digits".to_string(),
            ));
        }
        if self.expiry.trim().is_empty() {
            return Err(BookingError::Validation(
                "payment card expiry is required".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), BookingError> {
    if !email.contains('@') {
        return Err(BookingError::Validation(format!(
            "invalid contact email: {}",
            email
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traveler(first: &str, last: &str) -> Traveler {
        Traveler {
            first_name: first.to_string(),
            last_name: last.to_string(),
            date_of_birth: None,
            passenger_type: PassengerType::Adult,
        }
    }

    #[test]
    fn test_flight_details_require_travelers() {
        let details = FlightDetails {
            travelers: vec![],
            contact_email: "a@b.test".to_string(),
        };
        assert!(details.validate().is_err());
    }

    #[test]
    fn test_flight_details_reject_blank_name() {
        let details = FlightDetails {
            travelers: vec![traveler("", "Doe")],
            contact_email: "a@b.test".to_string(),
        };
        assert!(details.validate().is_err());
    }

    #[test]
    fn test_payment_last_four_must_be_digits() {
        let payment = PaymentInfo {
            card_type: "VISA".to_string(),
            last_four: "12ab".to_string(),
            expiry: "12/28".to_string(),
            token: None,
        };
        assert!(payment.validate().is_err());
    }
}
