use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wayfare_core::confirmation::ReservationRecord;
use wayfare_core::criteria::{CabinClass, FlightSearchCriteria};
use wayfare_core::money::Price;
use wayfare_core::offer::FlightOffer;
use wayfare_core::party::{PassengerType, Traveler};
use wayfare_core::provider::{
    CancellationOutcome, InventoryProvider, ProviderError, ReservationRequest, RevalidationOutcome,
};
use wayfare_core::resource::FlightResource;

use crate::transport::HttpTransport;

/// Thin adapter over the flight inventory provider's HTTP API.
pub struct HttpFlightGateway {
    transport: HttpTransport,
}

impl HttpFlightGateway {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            transport: HttpTransport::new(base_url, api_key, timeout)?,
        })
    }
}

#[derive(Debug, Serialize)]
struct FlightSearchBody<'a> {
    #[serde(rename = "Origin")]
    origin: &'a str,
    #[serde(rename = "Destination")]
    destination: &'a str,
    #[serde(rename = "DepartureDate")]
    departure_date: NaiveDate,
    #[serde(rename = "ReturnDate", skip_serializing_if = "Option::is_none")]
    return_date: Option<NaiveDate>,
    #[serde(rename = "Adults")]
    adults: u32,
    #[serde(rename = "Children")]
    children: u32,
    #[serde(rename = "CabinClass")]
    cabin_class: CabinClass,
}

#[derive(Debug, Deserialize)]
struct FlightSearchEnvelope {
    #[serde(rename = "Results")]
    results: Vec<FlightResultWire>,
}

#[derive(Debug, Deserialize)]
struct FlightResultWire {
    #[serde(rename = "ResultIndex")]
    result_index: String,
    #[serde(rename = "AirlineCode")]
    airline_code: String,
    #[serde(rename = "FlightNumber")]
    flight_number: String,
    #[serde(rename = "Origin")]
    origin: String,
    #[serde(rename = "Destination")]
    destination: String,
    #[serde(rename = "DepTime")]
    dep_time: DateTime<Utc>,
    #[serde(rename = "ArrTime")]
    arr_time: DateTime<Utc>,
    #[serde(rename = "CabinClass")]
    cabin_class: CabinClass,
    #[serde(rename = "IsRefundable")]
    is_refundable: bool,
    #[serde(rename = "OfferedFare")]
    offered_fare: i64,
    #[serde(rename = "Currency")]
    currency: String,
}

impl From<FlightResultWire> for FlightOffer {
    fn from(wire: FlightResultWire) -> Self {
        FlightOffer {
            id: Uuid::new_v4(),
            airline_code: wire.airline_code,
            flight_number: wire.flight_number,
            origin: wire.origin,
            destination: wire.destination,
            departure_time: wire.dep_time,
            arrival_time: wire.arr_time,
            cabin_class: wire.cabin_class,
            refundable: wire.is_refundable,
            offered_fare: Price::new(wire.offered_fare, wire.currency),
            fare_key: wire.result_index,
            synthetic: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct RepriceBody<'a> {
    #[serde(rename = "ResultIndex")]
    result_index: &'a str,
    #[serde(rename = "ExpectedFare")]
    expected_fare: i64,
    #[serde(rename = "Currency")]
    currency: &'a str,
}

#[derive(Debug, Deserialize)]
struct RepriceWire {
    #[serde(rename = "IsAvailable")]
    is_available: bool,
    #[serde(rename = "OfferedFare")]
    offered_fare: i64,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "ResultIndex")]
    result_index: String,
    #[serde(rename = "IsPolicyChanged", default)]
    is_policy_changed: bool,
}

#[derive(Debug, Serialize)]
struct PassengerWire<'a> {
    #[serde(rename = "FirstName")]
    first_name: &'a str,
    #[serde(rename = "LastName")]
    last_name: &'a str,
    #[serde(rename = "DateOfBirth", skip_serializing_if = "Option::is_none")]
    date_of_birth: Option<NaiveDate>,
    #[serde(rename = "Type")]
    passenger_type: PassengerType,
}

impl<'a> From<&'a Traveler> for PassengerWire<'a> {
    fn from(traveler: &'a Traveler) -> Self {
        Self {
            first_name: &traveler.first_name,
            last_name: &traveler.last_name,
            date_of_birth: traveler.date_of_birth,
            passenger_type: traveler.passenger_type,
        }
    }
}

#[derive(Debug, Serialize)]
struct BookBody<'a> {
    #[serde(rename = "ResultIndex")]
    result_index: &'a str,
    #[serde(rename = "Passengers")]
    passengers: Vec<PassengerWire<'a>>,
    #[serde(rename = "ContactEmail")]
    contact_email: &'a str,
    #[serde(rename = "CardType")]
    card_type: &'a str,
    #[serde(rename = "CardLastFour")]
    card_last_four: &'a str,
    #[serde(rename = "PaymentToken", skip_serializing_if = "Option::is_none")]
    payment_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct BookingWire {
    #[serde(rename = "PnrNumber")]
    pnr_number: String,
    #[serde(rename = "BookingId")]
    booking_id: String,
    #[serde(rename = "Status")]
    status: String,
}

impl From<BookingWire> for ReservationRecord {
    fn from(wire: BookingWire) -> Self {
        ReservationRecord {
            confirmation_number: wire.pnr_number,
            provider_reference: wire.booking_id,
            provider_status: wire.status,
            voucher_reference: None,
            synthetic: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CancellationWire {
    #[serde(rename = "BookingId")]
    booking_id: String,
    #[serde(rename = "Status")]
    status: String,
}

#[async_trait]
impl InventoryProvider<FlightResource> for HttpFlightGateway {
    async fn search(
        &self,
        criteria: &FlightSearchCriteria,
    ) -> Result<Vec<FlightOffer>, ProviderError> {
        let body = FlightSearchBody {
            origin: &criteria.origin,
            destination: &criteria.destination,
            departure_date: criteria.departure_date,
            return_date: criteria.return_date,
            adults: criteria.adults,
            children: criteria.children,
            cabin_class: criteria.cabin_class,
        };
        let envelope: FlightSearchEnvelope =
            self.transport.post_json("/api/flights/search", &body).await?;
        Ok(envelope.results.into_iter().map(FlightOffer::from).collect())
    }

    async fn price_revalidate(
        &self,
        lock_code: &str,
        quoted: &Price,
    ) -> Result<RevalidationOutcome, ProviderError> {
        let body = RepriceBody {
            result_index: lock_code,
            expected_fare: quoted.amount,
            currency: &quoted.currency,
        };
        let wire: RepriceWire = self.transport.post_json("/api/flights/reprice", &body).await?;
        Ok(RevalidationOutcome {
            available: wire.is_available,
            current_price: Price::new(wire.offered_fare, wire.currency),
            lock_code: wire.result_index,
            policy_changed: wire.is_policy_changed,
            synthetic: false,
        })
    }

    async fn create_reservation(
        &self,
        request: &ReservationRequest<FlightResource>,
    ) -> Result<ReservationRecord, ProviderError> {
        let body = BookBody {
            result_index: &request.lock_code,
            passengers: request.details.travelers.iter().map(PassengerWire::from).collect(),
            contact_email: &request.details.contact_email,
            card_type: &request.payment.card_type,
            card_last_four: &request.payment.last_four,
            payment_token: request.payment.token.as_deref(),
        };
        let wire: BookingWire = self.transport.post_json("/api/flights/book", &body).await?;
        Ok(wire.into())
    }

    async fn get_reservation(&self, reference: &str) -> Result<ReservationRecord, ProviderError> {
        let wire: BookingWire = self
            .transport
            .get_json(&format!("/api/flights/bookings/{}", reference))
            .await?;
        Ok(wire.into())
    }

    async fn cancel_reservation(
        &self,
        reference: &str,
    ) -> Result<CancellationOutcome, ProviderError> {
        let wire: CancellationWire = self
            .transport
            .post_json(
                &format!("/api/flights/bookings/{}/cancel", reference),
                &serde_json::json!({}),
            )
            .await?;
        Ok(CancellationOutcome {
            reference: wire.booking_id,
            status: wire.status,
            cancelled_at: Utc::now(),
            synthetic: false,
        })
    }
}
