use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use wayfare_booking::{
    BookingEngine, EngineDeps, FlightSelection, HotelSelection, MemoryRecorder, TripDetails,
    TripSelection, SESSION_TTL,
};
use wayfare_core::criteria::{CabinClass, FlightSearchCriteria, HotelSearchCriteria};
use wayfare_core::party::{
    FlightDetails, HotelDetails, HotelGuest, PassengerType, PaymentInfo, Traveler,
};
use wayfare_core::store::TenantId;
use wayfare_provider::fallback::{FallbackConfig, FlightSynthesizer, HotelSynthesizer};
use wayfare_store::MemoryStore;

/// Builds an engine that runs entirely against synthetic inventory: the
/// synthesizers stand in for live gateways, so the whole pipeline is
/// drivable offline.
fn offline_engine() -> (BookingEngine, Arc<MemoryRecorder>) {
    let recorder = Arc::new(MemoryRecorder::new());
    let fallback = FallbackConfig {
        price_change_probability: 0.0,
        max_drift_ratio: 0.10,
    };
    let engine = BookingEngine::new(EngineDeps {
        store: Arc::new(MemoryStore::new()),
        flight_gateway: Arc::new(FlightSynthesizer::new(fallback.clone())),
        flight_fallback: Arc::new(FlightSynthesizer::new(fallback.clone())),
        hotel_gateway: Arc::new(HotelSynthesizer::new(fallback.clone())),
        hotel_fallback: Arc::new(HotelSynthesizer::new(fallback)),
        recorder: Arc::clone(&recorder) as Arc<dyn wayfare_booking::ItineraryRecorder>,
        session_ttl: SESSION_TTL,
    });
    (engine, recorder)
}

fn flight_criteria() -> FlightSearchCriteria {
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

fn hotel_criteria() -> HotelSearchCriteria {
    HotelSearchCriteria {
        city_code: "LON".to_string(),
        check_in: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
        check_out: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        rooms: 1,
        adults: 1,
        children: 0,
    }
}

fn details() -> TripDetails {
    TripDetails {
        flight: Some(FlightDetails {
            travelers: vec![Traveler {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                date_of_birth: None,
                passenger_type: PassengerType::Adult,
            }],
            contact_email: "grace@example.test".to_string(),
        }),
        hotel: Some(HotelDetails {
            guests: vec![HotelGuest {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                age: None,
            }],
            contact_email: "grace@example.test".to_string(),
        }),
        payment: PaymentInfo {
            card_type: "VISA".to_string(),
            last_four: "4242".to_string(),
            expiry: "12/28".to_string(),
            token: Some("tok_test".to_string()),
        },
    }
}

#[tokio::test]
async fn test_search_select_revalidate_complete_offline() {
    let (engine, recorder) = offline_engine();
    let tenant = TenantId::from("tab-e2e");

    // 1. Search both inventories.
    let flights = engine.flights.search(&flight_criteria()).await.unwrap();
    let hotels = engine.hotels.search(&hotel_criteria()).await.unwrap();
    assert!(!flights.is_empty());
    assert!(!hotels.is_empty());
    assert!(flights.iter().all(|o| o.synthetic));

    // 2. Open a combined session for one offer of each.
    let selection = TripSelection::Both {
        flight: FlightSelection {
            offer: flights[0].clone(),
            criteria: flight_criteria(),
        },
        hotel: HotelSelection {
            offer: hotels[0].clone(),
            criteria: hotel_criteria(),
        },
    };
    let session = engine.trips.start_combined(&tenant, selection).await.unwrap();
    assert!(session.legs.has_flight() && session.legs.has_hotel());

    let expected_total =
        flights[0].offered_fare.amount + hotels[0].total_rate.amount;
    assert_eq!(engine.trips.total_cost(&tenant).await, expected_total);

    // 3. Revalidate both legs (drift probability is zero, so prices hold).
    let flight_check = engine.flights.revalidate_price(&tenant).await.unwrap();
    let hotel_check = engine.hotels.revalidate_price(&tenant).await.unwrap();
    assert!(!flight_check.price_changed);
    assert!(!hotel_check.price_changed);
    assert!(flight_check.synthetic && hotel_check.synthetic);

    // 4. Finalize. Both confirmations come back tagged synthetic.
    let confirmation = engine
        .trips
        .complete_combined(&tenant, details())
        .await
        .unwrap();
    let flight_confirmation = confirmation.flight.expect("flight leg confirmed");
    let hotel_confirmation = confirmation.hotel.expect("hotel leg confirmed");
    assert!(flight_confirmation.synthetic);
    assert!(hotel_confirmation.synthetic);
    assert_ne!(
        flight_confirmation.confirmation_number,
        hotel_confirmation.confirmation_number
    );
    assert_eq!(confirmation.total_amount, expected_total);

    // 5. Completion is terminal: every slot is cleared.
    assert!(engine.flights.current(&tenant).await.unwrap().is_none());
    assert!(engine.hotels.current(&tenant).await.unwrap().is_none());
    assert!(engine.trips.current(&tenant).await.unwrap().is_none());

    // 6. The itinerary recorder received both bookings (async, so poll).
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    loop {
        let entries = recorder.entries().await;
        if entries.len() == 2 {
            assert!(entries.iter().any(|e| {
                e.window.start == NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
            }));
            break;
        }
        if tokio::time::Instant::now() > deadline {
            panic!("recorder received {} entries, expected 2", entries.len());
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_restore_after_simulated_reload() {
    let (engine, _recorder) = offline_engine();
    let tenant = TenantId::from("tab-reload");

    let hotels = engine.hotels.search(&hotel_criteria()).await.unwrap();
    engine
        .trips
        .start_combined(
            &tenant,
            TripSelection::HotelOnly(HotelSelection {
                offer: hotels[0].clone(),
                criteria: hotel_criteria(),
            }),
        )
        .await
        .unwrap();

    // A reload drops timers and in-memory state; restore rebuilds from the
    // durable store and re-arms expiry.
    let restored = engine.trips.restore(&tenant).await.unwrap().unwrap();
    assert!(restored.legs.has_hotel());
    assert!(engine.hotels.current(&tenant).await.unwrap().is_some());
}
