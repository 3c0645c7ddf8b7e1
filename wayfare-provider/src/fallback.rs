use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveTime, Utc};
use rand::Rng;
use uuid::Uuid;

use wayfare_core::confirmation::ReservationRecord;
use wayfare_core::criteria::{CabinClass, FlightSearchCriteria, HotelSearchCriteria};
use wayfare_core::money::Price;
use wayfare_core::offer::{FlightOffer, HotelOffer, MealPlan};
use wayfare_core::provider::{
    CancellationOutcome, InventoryProvider, ProviderError, ReservationRequest, RevalidationOutcome,
};
use wayfare_core::resource::{FlightResource, HotelResource};

const SYNTHETIC_CURRENCY: &str = "EUR";

/// Tuning for the synthetic substitute data produced when a live provider
/// cannot be reached.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// Probability that a synthetic revalidation simulates a price change.
    /// Real providers reprice; the reconciliation path must stay exercised
    /// even in fallback mode.
    pub price_change_probability: f64,
    /// Largest simulated drift as a fraction of the quoted price.
    pub max_drift_ratio: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            price_change_probability: 0.25,
            max_drift_ratio: 0.10,
        }
    }
}

fn synthetic_revalidation(config: &FallbackConfig, quoted: &Price, lock_prefix: &str) -> RevalidationOutcome {
    let mut rng = rand::thread_rng();
    let current_amount = if rng.gen_bool(config.price_change_probability) {
        let ratio = rng.gen_range(0.01..config.max_drift_ratio.max(0.02));
        let drift = ((quoted.amount as f64 * ratio) as i64).max(1);
        if rng.gen_bool(0.5) {
            quoted.amount + drift
        } else {
            (quoted.amount - drift).max(1)
        }
    } else {
        quoted.amount
    };
    RevalidationOutcome {
        // A degraded price check never reads as "offer gone"; real
        // unavailability can only come from a live provider.
        available: true,
        current_price: Price::new(current_amount, quoted.currency.clone()),
        lock_code: format!("{}-{}", lock_prefix, Uuid::new_v4().simple()),
        policy_changed: false,
        synthetic: true,
    }
}

fn synthetic_record(prefix: &str, voucher: bool) -> ReservationRecord {
    let token = Uuid::new_v4().simple().to_string();
    ReservationRecord {
        confirmation_number: format!("{}{}", prefix, token[..10].to_uppercase()),
        provider_reference: Uuid::new_v4().to_string(),
        provider_status: "CONFIRMED".to_string(),
        voucher_reference: voucher.then(|| format!("VCH-{}", &token[10..18].to_uppercase())),
        synthetic: true,
    }
}

fn synthetic_cancellation(reference: &str) -> CancellationOutcome {
    CancellationOutcome {
        reference: reference.to_string(),
        status: "CANCELLED".to_string(),
        cancelled_at: Utc::now(),
        synthetic: true,
    }
}

/// Stands in for the flight provider when it is unreachable. Responses mirror
/// the live gateway's shapes and are tagged synthetic.
pub struct FlightSynthesizer {
    config: FallbackConfig,
}

impl FlightSynthesizer {
    pub fn new(config: FallbackConfig) -> Self {
        Self { config }
    }
}

impl Default for FlightSynthesizer {
    fn default() -> Self {
        Self::new(FallbackConfig::default())
    }
}

fn upsell_cabin(cabin: CabinClass) -> CabinClass {
    match cabin {
        CabinClass::Economy => CabinClass::PremiumEconomy,
        CabinClass::PremiumEconomy => CabinClass::Business,
        CabinClass::Business | CabinClass::First => CabinClass::First,
    }
}

fn cabin_fare_range(cabin: CabinClass) -> std::ops::Range<i64> {
    match cabin {
        CabinClass::Economy => 90..360,
        CabinClass::PremiumEconomy => 280..720,
        CabinClass::Business => 900..2_400,
        CabinClass::First => 2_200..5_600,
    }
}

#[async_trait]
impl InventoryProvider<FlightResource> for FlightSynthesizer {
    async fn search(
        &self,
        criteria: &FlightSearchCriteria,
    ) -> Result<Vec<FlightOffer>, ProviderError> {
        let mut rng = rand::thread_rng();
        let airlines = [("WA", "Wayfare Air"), ("BX", "Blue Axis"), ("NL", "Nordlicht")];
        let mut offers = Vec::new();
        for (i, (code, _name)) in airlines.iter().enumerate() {
            // One offer in the requested cabin and one upsell per carrier, so
            // filtering by fare class stays exercisable offline.
            for cabin in [criteria.cabin_class, upsell_cabin(criteria.cabin_class)] {
                let departure = criteria.departure_date.and_time(NaiveTime::MIN).and_utc()
                    + ChronoDuration::hours(6 + (i as i64) * 4);
                let fare = rng.gen_range(cabin_fare_range(cabin));
                offers.push(FlightOffer {
                    id: Uuid::new_v4(),
                    airline_code: code.to_string(),
                    flight_number: format!("{}{}", code, 100 + i * 37),
                    origin: criteria.origin.clone(),
                    destination: criteria.destination.clone(),
                    departure_time: departure,
                    arrival_time: departure + ChronoDuration::hours(7),
                    cabin_class: cabin,
                    refundable: rng.gen_bool(0.5),
                    offered_fare: Price::new(fare, SYNTHETIC_CURRENCY),
                    fare_key: format!("SYN-FL-{}", Uuid::new_v4().simple()),
                    synthetic: true,
                });
            }
        }
        Ok(offers)
    }

    async fn price_revalidate(
        &self,
        _lock_code: &str,
        quoted: &Price,
    ) -> Result<RevalidationOutcome, ProviderError> {
        Ok(synthetic_revalidation(&self.config, quoted, "SYN-FL"))
    }

    async fn create_reservation(
        &self,
        _request: &ReservationRequest<FlightResource>,
    ) -> Result<ReservationRecord, ProviderError> {
        Ok(synthetic_record("WF", false))
    }

    async fn get_reservation(&self, reference: &str) -> Result<ReservationRecord, ProviderError> {
        let mut record = synthetic_record("WF", false);
        record.provider_reference = reference.to_string();
        Ok(record)
    }

    async fn cancel_reservation(
        &self,
        reference: &str,
    ) -> Result<CancellationOutcome, ProviderError> {
        Ok(synthetic_cancellation(reference))
    }
}

/// Stands in for the hotel provider when it is unreachable. The synthetic
/// inventory spans several star ratings and meal plans so UI filters keep
/// working without a live provider.
pub struct HotelSynthesizer {
    config: FallbackConfig,
}

impl HotelSynthesizer {
    pub fn new(config: FallbackConfig) -> Self {
        Self { config }
    }
}

impl Default for HotelSynthesizer {
    fn default() -> Self {
        Self::new(FallbackConfig::default())
    }
}

const HOTEL_TEMPLATES: [(&str, u8, MealPlan, &str); 5] = [
    ("Harbour View Suites", 5, MealPlan::HalfBoard, "Junior Suite"),
    ("Grand Central Plaza", 4, MealPlan::BedAndBreakfast, "Double Deluxe"),
    ("Seaside Pavilion", 4, MealPlan::FullBoard, "Twin Sea View"),
    ("City Garden Inn", 3, MealPlan::RoomOnly, "Standard Double"),
    ("Old Town Lodge", 3, MealPlan::BedAndBreakfast, "Standard Twin"),
];

#[async_trait]
impl InventoryProvider<HotelResource> for HotelSynthesizer {
    async fn search(
        &self,
        criteria: &HotelSearchCriteria,
    ) -> Result<Vec<HotelOffer>, ProviderError> {
        let mut rng = rand::thread_rng();
        let nights = criteria.nights().max(1);
        let mut offers = Vec::new();
        for (i, (name, stars, meal_plan, room_type)) in HOTEL_TEMPLATES.iter().enumerate() {
            let nightly = rng.gen_range(40 * (*stars as i64)..120 * (*stars as i64));
            offers.push(HotelOffer {
                id: Uuid::new_v4(),
                hotel_code: format!("SYNH{:03}", i + 1),
                hotel_name: name.to_string(),
                city_code: criteria.city_code.clone(),
                star_rating: *stars,
                meal_plan: *meal_plan,
                room_type: room_type.to_string(),
                refundable: rng.gen_bool(0.6),
                nightly_rate: Price::new(nightly, SYNTHETIC_CURRENCY),
                total_rate: Price::new(nightly * nights, SYNTHETIC_CURRENCY),
                rate_key: format!("SYN-HT-{}", Uuid::new_v4().simple()),
                synthetic: true,
            });
        }
        Ok(offers)
    }

    async fn price_revalidate(
        &self,
        _lock_code: &str,
        quoted: &Price,
    ) -> Result<RevalidationOutcome, ProviderError> {
        Ok(synthetic_revalidation(&self.config, quoted, "SYN-HT"))
    }

    async fn create_reservation(
        &self,
        _request: &ReservationRequest<HotelResource>,
    ) -> Result<ReservationRecord, ProviderError> {
        Ok(synthetic_record("WH", true))
    }

    async fn get_reservation(&self, reference: &str) -> Result<ReservationRecord, ProviderError> {
        let mut record = synthetic_record("WH", true);
        record.provider_reference = reference.to_string();
        Ok(record)
    }

    async fn cancel_reservation(
        &self,
        reference: &str,
    ) -> Result<CancellationOutcome, ProviderError> {
        Ok(synthetic_cancellation(reference))
    }
}
