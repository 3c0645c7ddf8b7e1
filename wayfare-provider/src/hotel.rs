use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wayfare_core::confirmation::ReservationRecord;
use wayfare_core::criteria::HotelSearchCriteria;
use wayfare_core::money::Price;
use wayfare_core::offer::{HotelOffer, MealPlan};
use wayfare_core::party::HotelGuest;
use wayfare_core::provider::{
    CancellationOutcome, InventoryProvider, ProviderError, ReservationRequest, RevalidationOutcome,
};
use wayfare_core::resource::HotelResource;

use crate::transport::HttpTransport;

/// Thin adapter over the hotel inventory provider's HTTP API. The payloads
/// are analogous to the flight provider's but not identical; rates are
/// identified by `RateKey` rather than `ResultIndex`.
pub struct HttpHotelGateway {
    transport: HttpTransport,
}

impl HttpHotelGateway {
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
struct HotelSearchBody<'a> {
    #[serde(rename = "CityCode")]
    city_code: &'a str,
    #[serde(rename = "CheckIn")]
    check_in: NaiveDate,
    #[serde(rename = "CheckOut")]
    check_out: NaiveDate,
    #[serde(rename = "Rooms")]
    rooms: u32,
    #[serde(rename = "Adults")]
    adults: u32,
    #[serde(rename = "Children")]
    children: u32,
}

#[derive(Debug, Deserialize)]
struct HotelSearchEnvelope {
    #[serde(rename = "HotelResults")]
    hotel_results: Vec<HotelResultWire>,
}

#[derive(Debug, Deserialize)]
struct HotelResultWire {
    #[serde(rename = "RateKey")]
    rate_key: String,
    #[serde(rename = "HotelCode")]
    hotel_code: String,
    #[serde(rename = "HotelName")]
    hotel_name: String,
    #[serde(rename = "CityCode")]
    city_code: String,
    #[serde(rename = "StarRating")]
    star_rating: u8,
    #[serde(rename = "MealPlan")]
    meal_plan: MealPlan,
    #[serde(rename = "RoomType")]
    room_type: String,
    #[serde(rename = "IsRefundable")]
    is_refundable: bool,
    #[serde(rename = "NightlyFare")]
    nightly_fare: i64,
    #[serde(rename = "TotalFare")]
    total_fare: i64,
    #[serde(rename = "Currency")]
    currency: String,
}

impl From<HotelResultWire> for HotelOffer {
    fn from(wire: HotelResultWire) -> Self {
        HotelOffer {
            id: Uuid::new_v4(),
            hotel_code: wire.hotel_code,
            hotel_name: wire.hotel_name,
            city_code: wire.city_code,
            star_rating: wire.star_rating,
            meal_plan: wire.meal_plan,
            room_type: wire.room_type,
            refundable: wire.is_refundable,
            nightly_rate: Price::new(wire.nightly_fare, wire.currency.clone()),
            total_rate: Price::new(wire.total_fare, wire.currency),
            rate_key: wire.rate_key,
            synthetic: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct PrebookBody<'a> {
    #[serde(rename = "RateKey")]
    rate_key: &'a str,
    #[serde(rename = "ExpectedFare")]
    expected_fare: i64,
    #[serde(rename = "Currency")]
    currency: &'a str,
}

#[derive(Debug, Deserialize)]
struct PrebookWire {
    #[serde(rename = "Available")]
    available: bool,
    #[serde(rename = "TotalFare")]
    total_fare: i64,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "RateKey")]
    rate_key: String,
    #[serde(rename = "IsPolicyChanged", default)]
    is_policy_changed: bool,
}

#[derive(Debug, Serialize)]
struct GuestWire<'a> {
    #[serde(rename = "FirstName")]
    first_name: &'a str,
    #[serde(rename = "LastName")]
    last_name: &'a str,
    #[serde(rename = "Age", skip_serializing_if = "Option::is_none")]
    age: Option<u8>,
}

impl<'a> From<&'a HotelGuest> for GuestWire<'a> {
    fn from(guest: &'a HotelGuest) -> Self {
        Self {
            first_name: &guest.first_name,
            last_name: &guest.last_name,
            age: guest.age,
        }
    }
}

#[derive(Debug, Serialize)]
struct HotelBookBody<'a> {
    #[serde(rename = "RateKey")]
    rate_key: &'a str,
    #[serde(rename = "Guests")]
    guests: Vec<GuestWire<'a>>,
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
struct HotelBookingWire {
    #[serde(rename = "ConfirmationNo")]
    confirmation_no: String,
    #[serde(rename = "BookingRefNo")]
    booking_ref_no: String,
    #[serde(rename = "VoucherNo")]
    voucher_no: Option<String>,
    #[serde(rename = "Status")]
    status: String,
}

impl From<HotelBookingWire> for ReservationRecord {
    fn from(wire: HotelBookingWire) -> Self {
        ReservationRecord {
            confirmation_number: wire.confirmation_no,
            provider_reference: wire.booking_ref_no,
            provider_status: wire.status,
            voucher_reference: wire.voucher_no,
            synthetic: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HotelCancellationWire {
    #[serde(rename = "BookingRefNo")]
    booking_ref_no: String,
    #[serde(rename = "Status")]
    status: String,
}

#[async_trait]
impl InventoryProvider<HotelResource> for HttpHotelGateway {
    async fn search(
        &self,
        criteria: &HotelSearchCriteria,
    ) -> Result<Vec<HotelOffer>, ProviderError> {
        let body = HotelSearchBody {
            city_code: &criteria.city_code,
            check_in: criteria.check_in,
            check_out: criteria.check_out,
            rooms: criteria.rooms,
            adults: criteria.adults,
            children: criteria.children,
        };
        let envelope: HotelSearchEnvelope =
            self.transport.post_json("/api/hotels/search", &body).await?;
        Ok(envelope
            .hotel_results
            .into_iter()
            .map(HotelOffer::from)
            .collect())
    }

    async fn price_revalidate(
        &self,
        lock_code: &str,
        quoted: &Price,
    ) -> Result<RevalidationOutcome, ProviderError> {
        let body = PrebookBody {
            rate_key: lock_code,
            expected_fare: quoted.amount,
            currency: &quoted.currency,
        };
        let wire: PrebookWire = self.transport.post_json("/api/hotels/prebook", &body).await?;
        Ok(RevalidationOutcome {
            available: wire.available,
            current_price: Price::new(wire.total_fare, wire.currency),
            lock_code: wire.rate_key,
            policy_changed: wire.is_policy_changed,
            synthetic: false,
        })
    }

    async fn create_reservation(
        &self,
        request: &ReservationRequest<HotelResource>,
    ) -> Result<ReservationRecord, ProviderError> {
        let body = HotelBookBody {
            rate_key: &request.lock_code,
            guests: request.details.guests.iter().map(GuestWire::from).collect(),
            contact_email: &request.details.contact_email,
            card_type: &request.payment.card_type,
            card_last_four: &request.payment.last_four,
            payment_token: request.payment.token.as_deref(),
        };
        let wire: HotelBookingWire = self.transport.post_json("/api/hotels/book", &body).await?;
        Ok(wire.into())
    }

    async fn get_reservation(&self, reference: &str) -> Result<ReservationRecord, ProviderError> {
        let wire: HotelBookingWire = self
            .transport
            .get_json(&format!("/api/hotels/bookings/{}", reference))
            .await?;
        Ok(wire.into())
    }

    async fn cancel_reservation(
        &self,
        reference: &str,
    ) -> Result<CancellationOutcome, ProviderError> {
        let wire: HotelCancellationWire = self
            .transport
            .post_json(
                &format!("/api/hotels/bookings/{}/cancel", reference),
                &serde_json::json!({}),
            )
            .await?;
        Ok(CancellationOutcome {
            reference: wire.booking_ref_no,
            status: wire.status,
            cancelled_at: Utc::now(),
            synthetic: false,
        })
    }
}
