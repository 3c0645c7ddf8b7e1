use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use wayfare_core::confirmation::ReservationRecord;
use wayfare_core::criteria::{CabinClass, FlightSearchCriteria, HotelSearchCriteria};
use wayfare_core::money::Price;
use wayfare_core::offer::{FlightOffer, HotelOffer, MealPlan};
use wayfare_core::party::{
    FlightDetails, HotelDetails, HotelGuest, PassengerType, PaymentInfo, Traveler,
};
use wayfare_core::provider::{
    CancellationOutcome, InventoryProvider, ProviderError, ReservationRequest, RevalidationOutcome,
};
use wayfare_core::resource::BookableResource;
use wayfare_core::store::TenantId;

/// Scriptable stand-in for a live provider gateway.
#[derive(Default)]
pub struct ScriptedGateway {
    pub fail_search: AtomicBool,
    pub fail_revalidate: AtomicBool,
    pub unavailable: AtomicBool,
    pub fail_book: AtomicBool,
    pub reprice_amount: parking_lot::Mutex<Option<i64>>,
    pub book_calls: AtomicUsize,
    pub cancel_calls: AtomicUsize,
    pub last_book_lock_code: parking_lot::Mutex<Option<String>>,
}

#[async_trait::async_trait]
impl<R: BookableResource> InventoryProvider<R> for ScriptedGateway {
    async fn search(&self, _criteria: &R::Criteria) -> Result<Vec<R::Snapshot>, ProviderError> {
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(ProviderError::Network("connection refused".to_string()));
        }
        Ok(vec![])
    }

    async fn price_revalidate(
        &self,
        _lock_code: &str,
        quoted: &Price,
    ) -> Result<RevalidationOutcome, ProviderError> {
        if self.fail_revalidate.load(Ordering::SeqCst) {
            return Err(ProviderError::Network("connection refused".to_string()));
        }
        let amount = self.reprice_amount.lock().unwrap_or(quoted.amount);
        Ok(RevalidationOutcome {
            available: !self.unavailable.load(Ordering::SeqCst),
            current_price: Price::new(amount, quoted.currency.clone()),
            lock_code: "RV-LOCK-1".to_string(),
            policy_changed: false,
            synthetic: false,
        })
    }

    async fn create_reservation(
        &self,
        request: &ReservationRequest<R>,
    ) -> Result<ReservationRecord, ProviderError> {
        self.book_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_book_lock_code.lock() = Some(request.lock_code.clone());
        if self.fail_book.load(Ordering::SeqCst) {
            return Err(ProviderError::Status {
                status: 502,
                message: "upstream unavailable".to_string(),
            });
        }
        Ok(ReservationRecord {
            confirmation_number: "CONF-1".to_string(),
            provider_reference: "REF-1".to_string(),
            provider_status: "CONFIRMED".to_string(),
            voucher_reference: None,
            synthetic: false,
        })
    }

    async fn get_reservation(&self, reference: &str) -> Result<ReservationRecord, ProviderError> {
        Ok(ReservationRecord {
            confirmation_number: "CONF-1".to_string(),
            provider_reference: reference.to_string(),
            provider_status: "CONFIRMED".to_string(),
            voucher_reference: None,
            synthetic: false,
        })
    }

    async fn cancel_reservation(
        &self,
        reference: &str,
    ) -> Result<CancellationOutcome, ProviderError> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CancellationOutcome {
            reference: reference.to_string(),
            status: "CANCELLED".to_string(),
            cancelled_at: Utc::now(),
            synthetic: false,
        })
    }
}

pub fn flight_offer(amount: i64) -> FlightOffer {
    FlightOffer {
        id: Uuid::new_v4(),
        airline_code: "WA".to_string(),
        flight_number: "WA100".to_string(),
        origin: "JFK".to_string(),
        destination: "LHR".to_string(),
        departure_time: Utc::now(),
        arrival_time: Utc::now(),
        cabin_class: CabinClass::Economy,
        refundable: true,
        offered_fare: Price::new(amount, "EUR"),
        fare_key: "FARE-ORIG".to_string(),
        synthetic: false,
    }
}

pub fn flight_criteria() -> FlightSearchCriteria {
    FlightSearchCriteria {
        origin: "JFK".to_string(),
        destination: "LHR".to_string(),
        departure_date: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
        return_date: Some(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()),
        adults: 1,
        children: 0,
        cabin_class: CabinClass::Economy,
    }
}

pub fn hotel_offer(amount: i64) -> HotelOffer {
    HotelOffer {
        id: Uuid::new_v4(),
        hotel_code: "H001".to_string(),
        hotel_name: "Grand Central Plaza".to_string(),
        city_code: "PAR".to_string(),
        star_rating: 4,
        meal_plan: MealPlan::BedAndBreakfast,
        room_type: "Double Deluxe".to_string(),
        refundable: true,
        nightly_rate: Price::new(amount / 3, "EUR"),
        total_rate: Price::new(amount, "EUR"),
        rate_key: "RATE-ORIG".to_string(),
        synthetic: false,
    }
}

pub fn hotel_criteria() -> HotelSearchCriteria {
    HotelSearchCriteria {
        city_code: "PAR".to_string(),
        check_in: NaiveDate::from_ymd_opt(2026, 11, 5).unwrap(),
        check_out: NaiveDate::from_ymd_opt(2026, 11, 8).unwrap(),
        rooms: 1,
        adults: 2,
        children: 0,
    }
}

pub fn flight_details() -> FlightDetails {
    FlightDetails {
        travelers: vec![Traveler {
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
            date_of_birth: None,
            passenger_type: PassengerType::Adult,
        }],
        contact_email: "ada@example.test".to_string(),
    }
}

pub fn hotel_details() -> HotelDetails {
    HotelDetails {
        guests: vec![HotelGuest {
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
            age: None,
        }],
        contact_email: "ada@example.test".to_string(),
    }
}

pub fn payment() -> PaymentInfo {
    PaymentInfo {
        card_type: "VISA".to_string(),
        last_four: "4242".to_string(),
        expiry: "12/28".to_string(),
        token: Some("tok_test".to_string()),
    }
}

pub fn tenant() -> TenantId {
    TenantId::from("tab-1")
}
