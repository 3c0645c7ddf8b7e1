use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::criteria::CabinClass;
use crate::money::Price;

/// A priced flight offer as returned by the flight provider's search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightOffer {
    pub id: Uuid,
    pub airline_code: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub cabin_class: CabinClass,
    pub refundable: bool,
    pub offered_fare: Price,
    /// Provider token identifying this priced offer; superseded on revalidation.
    pub fare_key: String,
    pub synthetic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealPlan {
    RoomOnly,
    BedAndBreakfast,
    HalfBoard,
    FullBoard,
    AllInclusive,
}

/// A priced hotel room offer as returned by the hotel provider's search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelOffer {
    pub id: Uuid,
    pub hotel_code: String,
    pub hotel_name: String,
    pub city_code: String,
    pub star_rating: u8,
    pub meal_plan: MealPlan,
    pub room_type: String,
    pub refundable: bool,
    pub nightly_rate: Price,
    pub total_rate: Price,
    /// Provider token identifying this priced rate; superseded on revalidation.
    pub rate_key: String,
    pub synthetic: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_plan_wire_names() {
        let json = serde_json::to_string(&MealPlan::BedAndBreakfast).unwrap();
        assert_eq!(json, "\"BED_AND_BREAKFAST\"");
        let parsed: MealPlan = serde_json::from_str("\"HALF_BOARD\"").unwrap();
        assert_eq!(parsed, MealPlan::HalfBoard);
    }
}
