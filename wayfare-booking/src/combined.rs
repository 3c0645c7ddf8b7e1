use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use uuid::Uuid;

use wayfare_core::confirmation::BookingConfirmation;
use wayfare_core::criteria::{FlightSearchCriteria, HotelSearchCriteria};
use wayfare_core::error::BookingError;
use wayfare_core::offer::{FlightOffer, HotelOffer};
use wayfare_core::party::{FlightDetails, HotelDetails, PaymentInfo};
use wayfare_core::provider::CancellationOutcome;
use wayfare_core::store::{SessionKey, SessionKind, SessionStore, StoreError, TenantId};

use crate::events::EngineEvent;
use crate::manager::{FlightSessionManager, HotelSessionManager};
use crate::session::SessionStatus;
use crate::timer::ExpiryTimers;

#[derive(Debug, Clone)]
pub struct FlightSelection {
    pub offer: FlightOffer,
    pub criteria: FlightSearchCriteria,
}

#[derive(Debug, Clone)]
pub struct HotelSelection {
    pub offer: HotelOffer,
    pub criteria: HotelSearchCriteria,
}

/// What the traveler picked. The variant makes "at least one leg" a
/// property of the type rather than a check at every call site.
#[derive(Debug, Clone)]
pub enum TripSelection {
    FlightOnly(FlightSelection),
    HotelOnly(HotelSelection),
    Both {
        flight: FlightSelection,
        hotel: HotelSelection,
    },
}

/// Which sub-sessions a combined session owns. Holds their ids only; the
/// sub-session state stays with the owning manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "legs", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripLegs {
    FlightOnly { flight: Uuid },
    HotelOnly { hotel: Uuid },
    Both { flight: Uuid, hotel: Uuid },
}

impl TripLegs {
    pub fn has_flight(&self) -> bool {
        matches!(self, TripLegs::FlightOnly { .. } | TripLegs::Both { .. })
    }

    pub fn has_hotel(&self) -> bool {
        matches!(self, TripLegs::HotelOnly { .. } | TripLegs::Both { .. })
    }
}

/// Meta-session aggregating one flight and/or one hotel transaction behind a
/// single logical operation. Carries its own TTL, independent of the legs'.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedSession {
    pub session_id: Uuid,
    pub legs: TripLegs,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CombinedSession {
    fn new(legs: TripLegs, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            legs,
            status: SessionStatus::Details,
            created_at: now,
            expires_at: now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero()),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    fn remaining_ttl(&self) -> Duration {
        (self.expires_at - Utc::now()).to_std().unwrap_or_default()
    }
}

/// Traveler/guest manifests plus payment for a combined finalize. Each
/// present leg must have its manifest.
#[derive(Debug, Clone)]
pub struct TripDetails {
    pub flight: Option<FlightDetails>,
    pub hotel: Option<HotelDetails>,
    pub payment: PaymentInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedConfirmation {
    pub flight: Option<BookingConfirmation>,
    pub hotel: Option<BookingConfirmation>,
    pub total_amount: i64,
    pub booked_at: DateTime<Utc>,
}

/// What happened to the already-booked flight leg after the hotel leg failed.
#[derive(Debug)]
pub enum CompensationOutcome {
    /// The flight reservation was cancelled with the provider.
    Cancelled(CancellationOutcome),
    /// Cancellation was attempted and failed; the flight stays booked and
    /// needs operational follow-up.
    Failed(String),
}

#[derive(Error, Debug)]
pub enum CombinedError {
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// The flight leg was confirmed, the hotel leg failed. A best-effort
    /// cancellation of the flight reservation was attempted; `compensation`
    /// says how that went.
    #[error("hotel leg failed after the flight leg was confirmed: {source}")]
    PartialCompletion {
        flight_confirmation: BookingConfirmation,
        compensation: CompensationOutcome,
        source: BookingError,
    },
}

/// Presents one resource-agnostic API over the two session managers:
/// aggregate status and cost, cascading cancel/restore, and the sequential
/// two-leg completion (flight before hotel).
pub struct CombinedOrchestrator {
    flights: Arc<FlightSessionManager>,
    hotels: Arc<HotelSessionManager>,
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<EngineEvent>,
    ttl: Duration,
    timers: ExpiryTimers,
}

impl CombinedOrchestrator {
    pub fn new(
        flights: Arc<FlightSessionManager>,
        hotels: Arc<HotelSessionManager>,
        store: Arc<dyn SessionStore>,
        events: broadcast::Sender<EngineEvent>,
        ttl: Duration,
    ) -> Self {
        Self {
            flights,
            hotels,
            store,
            events,
            ttl,
            timers: ExpiryTimers::new(),
        }
    }

    fn key(&self, tenant: &TenantId) -> SessionKey {
        SessionKey::new(tenant.clone(), SessionKind::Combined)
    }

    /// Open a combined session for the selected legs, superseding any prior
    /// combined session (and its sub-sessions) for this tenant.
    pub async fn start_combined(
        &self,
        tenant: &TenantId,
        selection: TripSelection,
    ) -> Result<CombinedSession, BookingError> {
        self.cancel(tenant).await?;

        let legs = match selection {
            TripSelection::FlightOnly(flight) => {
                let session = self
                    .flights
                    .start(tenant, flight.offer, flight.criteria)
                    .await?;
                TripLegs::FlightOnly {
                    flight: session.session_id,
                }
            }
            TripSelection::HotelOnly(hotel) => {
                let session = self.hotels.start(tenant, hotel.offer, hotel.criteria).await?;
                TripLegs::HotelOnly {
                    hotel: session.session_id,
                }
            }
            TripSelection::Both { flight, hotel } => {
                let flight_session = self
                    .flights
                    .start(tenant, flight.offer, flight.criteria)
                    .await?;
                let hotel_session = self.hotels.start(tenant, hotel.offer, hotel.criteria).await?;
                TripLegs::Both {
                    flight: flight_session.session_id,
                    hotel: hotel_session.session_id,
                }
            }
        };

        let mut session = CombinedSession::new(legs, self.ttl);
        session.status = self.coarse_status(tenant, &session.legs).await;
        self.persist(tenant, &session).await?;
        let key = self.key(tenant);
        self.timers.arm(
            &key,
            session.expires_at,
            Arc::clone(&self.store),
            self.events.clone(),
        );
        info!(tenant = %tenant, session_id = %session.session_id, "combined session started");
        let _ = self.events.send(EngineEvent::SessionStarted {
            kind: SessionKind::Combined,
            tenant: tenant.clone(),
            session_id: session.session_id,
        });
        Ok(session)
    }

    pub async fn current(&self, tenant: &TenantId) -> Result<Option<CombinedSession>, BookingError> {
        self.slot(tenant).await
    }

    /// Sum of the most authoritative known price per active sub-session:
    /// revalidated where available, quoted otherwise. Infallible so UI cost
    /// previews are always safe to call; no session means 0.
    pub async fn total_cost(&self, tenant: &TenantId) -> i64 {
        let mut total = 0;
        if let Ok(Some(session)) = self.flights.current(tenant).await {
            total += session.effective_price().amount;
        }
        if let Ok(Some(session)) = self.hotels.current(tenant).await {
            total += session.effective_price().amount;
        }
        total
    }

    /// Sequential, flight-first completion of the present legs. If the hotel
    /// leg fails after the flight leg was confirmed, a best-effort
    /// cancellation of the flight reservation is attempted and the partial
    /// state is reported in full rather than hidden.
    pub async fn complete_combined(
        &self,
        tenant: &TenantId,
        details: TripDetails,
    ) -> Result<CombinedConfirmation, CombinedError> {
        let mut session = match self.slot(tenant).await? {
            Some(session) => session,
            None => {
                return Err(CombinedError::Booking(BookingError::NoActiveSession(
                    SessionKind::Combined,
                )))
            }
        };

        let TripDetails {
            flight: flight_details,
            hotel: hotel_details,
            payment,
        } = details;
        if session.legs.has_flight() && flight_details.is_none() {
            return Err(CombinedError::Booking(BookingError::Validation(
                "traveler details required for the flight leg".to_string(),
            )));
        }
        if session.legs.has_hotel() && hotel_details.is_none() {
            return Err(CombinedError::Booking(BookingError::Validation(
                "guest details required for the hotel leg".to_string(),
            )));
        }

        session.status = SessionStatus::Confirming;
        self.persist(tenant, &session).await?;

        let mut flight_confirmation = None;
        if let Some(flight_details) = flight_details {
            if session.legs.has_flight() {
                flight_confirmation = Some(
                    self.flights
                        .complete_booking(tenant, flight_details, payment.clone())
                        .await?,
                );
            }
        }

        let mut hotel_confirmation = None;
        if let Some(hotel_details) = hotel_details {
            if session.legs.has_hotel() {
                match self
                    .hotels
                    .complete_booking(tenant, hotel_details, payment)
                    .await
                {
                    Ok(confirmation) => hotel_confirmation = Some(confirmation),
                    Err(source) => {
                        if let Some(flight_confirmation) = flight_confirmation {
                            let compensation = self.compensate_flight(&flight_confirmation).await;
                            return Err(CombinedError::PartialCompletion {
                                flight_confirmation,
                                compensation,
                                source,
                            });
                        }
                        return Err(source.into());
                    }
                }
            }
        }

        let key = self.key(tenant);
        self.timers.clear(&key);
        self.store
            .delete(&key)
            .await
            .map_err(BookingError::from)?;

        let total_amount = flight_confirmation
            .as_ref()
            .map(|c| c.total.amount)
            .unwrap_or(0)
            + hotel_confirmation
                .as_ref()
                .map(|c| c.total.amount)
                .unwrap_or(0);
        info!(tenant = %tenant, total_amount, "combined booking completed");
        Ok(CombinedConfirmation {
            flight: flight_confirmation,
            hotel: hotel_confirmation,
            total_amount,
            booked_at: Utc::now(),
        })
    }

    /// Cancel the combined session and cascade into both sub-managers.
    /// Idempotent.
    pub async fn cancel(&self, tenant: &TenantId) -> Result<(), BookingError> {
        self.flights.cancel(tenant).await?;
        self.hotels.cancel(tenant).await?;

        let key = self.key(tenant);
        self.timers.clear(&key);
        let existed = self.store.get(&key).await?.is_some();
        self.store.delete(&key).await?;
        if existed {
            info!(tenant = %tenant, "combined session cancelled");
            let _ = self.events.send(EngineEvent::SessionCancelled {
                kind: SessionKind::Combined,
                tenant: tenant.clone(),
            });
        }
        Ok(())
    }

    /// Reconstruct the combined session and cascade restoration into the
    /// legs it owns. If every owned leg is gone (expired or never persisted)
    /// the combined session is cleared too.
    pub async fn restore(&self, tenant: &TenantId) -> Result<Option<CombinedSession>, BookingError> {
        let Some(mut session) = self.slot(tenant).await? else {
            return Ok(None);
        };

        let mut surviving = false;
        if session.legs.has_flight() {
            surviving |= self.flights.restore(tenant).await?.is_some();
        }
        if session.legs.has_hotel() {
            surviving |= self.hotels.restore(tenant).await?.is_some();
        }
        if !surviving {
            warn!(tenant = %tenant, "combined session has no surviving legs, clearing");
            let key = self.key(tenant);
            self.timers.clear(&key);
            self.store.delete(&key).await?;
            return Ok(None);
        }

        session.status = self.coarse_status(tenant, &session.legs).await;
        self.persist(tenant, &session).await?;
        self.timers.arm(
            &self.key(tenant),
            session.expires_at,
            Arc::clone(&self.store),
            self.events.clone(),
        );
        info!(tenant = %tenant, session_id = %session.session_id, "combined session restored");
        Ok(Some(session))
    }

    /// Earliest incomplete stage across the present legs; that is the step
    /// the caller still has to drive.
    async fn coarse_status(&self, tenant: &TenantId, legs: &TripLegs) -> SessionStatus {
        let mut earliest = None::<SessionStatus>;
        if legs.has_flight() {
            if let Ok(Some(session)) = self.flights.current(tenant).await {
                earliest = Some(session.status);
            }
        }
        if legs.has_hotel() {
            if let Ok(Some(session)) = self.hotels.current(tenant).await {
                earliest = match earliest {
                    Some(status) if status.rank() <= session.status.rank() => Some(status),
                    _ => Some(session.status),
                };
            }
        }
        earliest.unwrap_or(SessionStatus::Details)
    }

    async fn compensate_flight(&self, confirmation: &BookingConfirmation) -> CompensationOutcome {
        match self
            .flights
            .cancel_reservation(&confirmation.provider_reference)
            .await
        {
            Ok(outcome) => {
                info!(
                    reference = %confirmation.provider_reference,
                    "flight leg cancelled after hotel leg failure"
                );
                CompensationOutcome::Cancelled(outcome)
            }
            Err(err) => {
                error!(
                    reference = %confirmation.provider_reference,
                    error = %err,
                    "flight leg compensation failed; reservation needs follow-up"
                );
                CompensationOutcome::Failed(err.to_string())
            }
        }
    }

    /// Lazy validity check for the combined slot, mirroring the managers'.
    async fn slot(&self, tenant: &TenantId) -> Result<Option<CombinedSession>, BookingError> {
        let key = self.key(tenant);
        let Some(payload) = self.store.get(&key).await? else {
            return Ok(None);
        };
        let session = match serde_json::from_str::<CombinedSession>(&payload) {
            Ok(session) => session,
            Err(err) => {
                warn!(key = %key.storage_key(), error = %err, "stored combined session unreadable, clearing");
                self.store.delete(&key).await?;
                return Ok(None);
            }
        };
        if session.is_expired() {
            self.timers.clear(&key);
            self.store.delete(&key).await?;
            info!(tenant = %tenant, session_id = %session.session_id, "combined session expired");
            let _ = self.events.send(EngineEvent::SessionExpired {
                kind: SessionKind::Combined,
                tenant: tenant.clone(),
                session_id: session.session_id,
            });
            return Ok(None);
        }
        Ok(Some(session))
    }

    async fn persist(&self, tenant: &TenantId, session: &CombinedSession) -> Result<(), BookingError> {
        let payload = serde_json::to_string(session)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store
            .put(&self.key(tenant), &payload, session.remaining_ttl())
            .await?;
        Ok(())
    }
}
