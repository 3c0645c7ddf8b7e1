use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{info, warn};

use wayfare_core::confirmation::{BookingConfirmation, ReservationRecord};
use wayfare_core::error::BookingError;
use wayfare_core::money::Price;
use wayfare_core::party::PaymentInfo;
use wayfare_core::provider::{
    CancellationOutcome, InventoryProvider, ReservationRequest, RevalidationOutcome,
};
use wayfare_core::resource::{BookableResource, FlightResource, HotelResource};
use wayfare_core::store::{SessionKey, SessionStore, StoreError, TenantId};

use crate::events::EngineEvent;
use crate::recorder::{ItineraryEntry, ItineraryRecorder};
use crate::session::{BookingSession, RevalidationResult, SessionStatus};
use crate::timer::ExpiryTimers;

/// Partial-field merge applied by `update`. Terminal statuses cannot be set
/// this way; cancellation and completion go through their own operations.
#[derive(Debug, Default, Clone)]
pub struct SessionUpdate {
    pub status: Option<SessionStatus>,
    pub revalidation: Option<RevalidationResult>,
}

enum Slot<R: BookableResource> {
    Vacant,
    Expired,
    Active(BookingSession<R>),
}

/// Owns one resource type's booking transaction per tenant key: issuing,
/// updating, expiring and persisting the session, price revalidation, and
/// finalization. Search and revalidation degrade to the fallback provider;
/// finalize never does.
pub struct ResourceSessionManager<R: BookableResource> {
    store: Arc<dyn SessionStore>,
    gateway: Arc<dyn InventoryProvider<R>>,
    fallback: Arc<dyn InventoryProvider<R>>,
    recorder: Arc<dyn ItineraryRecorder>,
    events: broadcast::Sender<EngineEvent>,
    ttl: Duration,
    timers: ExpiryTimers,
}

pub type FlightSessionManager = ResourceSessionManager<FlightResource>;
pub type HotelSessionManager = ResourceSessionManager<HotelResource>;

impl<R: BookableResource> ResourceSessionManager<R> {
    pub fn new(
        store: Arc<dyn SessionStore>,
        gateway: Arc<dyn InventoryProvider<R>>,
        fallback: Arc<dyn InventoryProvider<R>>,
        recorder: Arc<dyn ItineraryRecorder>,
        events: broadcast::Sender<EngineEvent>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            gateway,
            fallback,
            recorder,
            events,
            ttl,
            timers: ExpiryTimers::new(),
        }
    }

    fn key(&self, tenant: &TenantId) -> SessionKey {
        SessionKey::new(tenant.clone(), R::KIND.into())
    }

    /// Search the provider's inventory. A gateway failure is substituted by
    /// the fallback synthesizer; callers inspect the offers' `synthetic` flag
    /// rather than branching on degraded control flow.
    pub async fn search(&self, criteria: &R::Criteria) -> Result<Vec<R::Snapshot>, BookingError> {
        R::validate_criteria(criteria)?;
        match self.gateway.search(criteria).await {
            Ok(offers) => Ok(offers),
            Err(err) => {
                warn!(kind = %R::KIND, error = %err, "provider search failed, serving synthetic inventory");
                let _ = self.events.send(EngineEvent::FallbackEngaged {
                    kind: R::KIND,
                    operation: "search",
                });
                Ok(self.fallback.search(criteria).await?)
            }
        }
    }

    /// Open a new session for the selected offer, superseding any session
    /// this tenant already had for this resource type.
    pub async fn start(
        &self,
        tenant: &TenantId,
        resource: R::Snapshot,
        criteria: R::Criteria,
    ) -> Result<BookingSession<R>, BookingError> {
        self.cancel(tenant).await?;

        let session = BookingSession::<R>::new(resource, criteria, self.ttl);
        self.persist(tenant, &session).await?;
        let key = self.key(tenant);
        self.timers.arm(
            &key,
            session.expires_at,
            Arc::clone(&self.store),
            self.events.clone(),
        );
        info!(tenant = %tenant, kind = %R::KIND, session_id = %session.session_id, "booking session started");
        let _ = self.events.send(EngineEvent::SessionStarted {
            kind: key.kind,
            tenant: tenant.clone(),
            session_id: session.session_id,
        });
        Ok(session)
    }

    /// The session if one exists and is still valid. An expired session is
    /// cleaned up and reported absent, so no caller ever observes a logically
    /// expired session even if the timer was lost.
    pub async fn current(&self, tenant: &TenantId) -> Result<Option<BookingSession<R>>, BookingError> {
        match self.slot(tenant).await? {
            Slot::Active(session) => Ok(Some(session)),
            _ => Ok(None),
        }
    }

    /// Merge partial fields into the active session and re-persist.
    pub async fn update(
        &self,
        tenant: &TenantId,
        update: SessionUpdate,
    ) -> Result<BookingSession<R>, BookingError> {
        let mut session = self.active(tenant).await?;
        if let Some(status) = update.status {
            if status.is_terminal() {
                return Err(BookingError::Validation(
                    "terminal statuses are reached through cancel or finalize".to_string(),
                ));
            }
            session.status = status;
        }
        if let Some(revalidation) = update.revalidation {
            session.lock_code = revalidation.lock_code.clone();
            session.revalidation = Some(revalidation);
        }
        self.persist(tenant, &session).await?;
        Ok(session)
    }

    /// Re-check price and availability for the active session's lock code.
    /// On success the session's lock code is superseded by the outcome's and
    /// the result is attached for the finalize step. A gateway failure is
    /// substituted by the fallback synthesizer and never surfaces; the
    /// synthetic result is tagged and never reads as unavailability.
    pub async fn revalidate_price(
        &self,
        tenant: &TenantId,
    ) -> Result<RevalidationResult, BookingError> {
        let mut session = self.active(tenant).await?;
        let quoted = session.quoted_price();

        let outcome = match self
            .gateway
            .price_revalidate(&session.lock_code, &quoted)
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(kind = %R::KIND, error = %err, "price revalidation failed, serving synthetic outcome");
                let _ = self.events.send(EngineEvent::FallbackEngaged {
                    kind: R::KIND,
                    operation: "price_revalidate",
                });
                self.fallback
                    .price_revalidate(&session.lock_code, &quoted)
                    .await?
            }
        };

        if !outcome.available {
            // The offer is gone but the session is preserved; the caller
            // returns to selection without losing other state.
            return Err(BookingError::ResourceUnavailable);
        }

        let result = Self::reconcile(quoted, outcome);
        session.lock_code = result.lock_code.clone();
        session.revalidation = Some(result.clone());
        self.persist(tenant, &session).await?;
        info!(
            tenant = %tenant,
            kind = %R::KIND,
            price_changed = result.price_changed,
            synthetic = result.synthetic,
            "price revalidated"
        );
        Ok(result)
    }

    /// `price_changed` is derived here, not taken from the provider, so an
    /// unchanged verdict always implies equal prices.
    fn reconcile(quoted: Price, outcome: RevalidationOutcome) -> RevalidationResult {
        RevalidationResult {
            available: true,
            price_changed: outcome.current_price != quoted,
            original_price: quoted,
            current_price: outcome.current_price,
            lock_code: outcome.lock_code,
            policy_changed: outcome.policy_changed,
            synthetic: outcome.synthetic,
        }
    }

    /// Finalize the reservation with the provider. Requires a prior
    /// successful revalidation in this session and always books with the
    /// revalidated lock code. On provider failure the session is left
    /// untouched so the identical call can be retried; synthetic data is
    /// never substituted for a real payment attempt.
    pub async fn complete_booking(
        &self,
        tenant: &TenantId,
        details: R::Details,
        payment: PaymentInfo,
    ) -> Result<BookingConfirmation, BookingError> {
        let mut session = self.active(tenant).await?;
        let Some(revalidation) = session.revalidation.clone() else {
            return Err(BookingError::RevalidationRequired);
        };
        R::validate_details(&details)?;
        payment.validate()?;

        let request = ReservationRequest::<R> {
            lock_code: session.lock_code.clone(),
            details,
            payment,
        };
        let record = self.gateway.create_reservation(&request).await?;

        session.status = SessionStatus::Confirmed;
        let confirmation = BookingConfirmation {
            confirmation_number: record.confirmation_number,
            provider_reference: record.provider_reference,
            kind: R::KIND,
            party: R::party_names(&request.details),
            total: revalidation.current_price,
            booked_at: chrono::Utc::now(),
            provider_status: record.provider_status,
            voucher_reference: record.voucher_reference,
            synthetic: record.synthetic,
        };

        self.record_itinerary(&session, &confirmation);

        // Confirmed is terminal: the slot is cleared, so any further call
        // reports NoActiveSession.
        let key = self.key(tenant);
        self.timers.clear(&key);
        self.store.delete(&key).await?;

        info!(
            tenant = %tenant,
            kind = %R::KIND,
            confirmation = %confirmation.confirmation_number,
            synthetic = confirmation.synthetic,
            "booking confirmed"
        );
        let _ = self.events.send(EngineEvent::BookingConfirmed {
            kind: R::KIND,
            tenant: tenant.clone(),
            confirmation_number: confirmation.confirmation_number.clone(),
            synthetic: confirmation.synthetic,
        });
        Ok(confirmation)
    }

    /// Drop the session, its persisted state and its timer. Idempotent.
    pub async fn cancel(&self, tenant: &TenantId) -> Result<(), BookingError> {
        let key = self.key(tenant);
        self.timers.clear(&key);
        let existed = self.store.get(&key).await?.is_some();
        self.store.delete(&key).await?;
        if existed {
            info!(tenant = %tenant, kind = %R::KIND, "booking session cancelled");
            let _ = self.events.send(EngineEvent::SessionCancelled {
                kind: key.kind,
                tenant: tenant.clone(),
            });
        }
        Ok(())
    }

    /// Reconstruct the session from durable storage, e.g. after a restart.
    /// This is the only path that re-arms the expiry timer; timers do not
    /// survive restarts.
    pub async fn restore(&self, tenant: &TenantId) -> Result<Option<BookingSession<R>>, BookingError> {
        match self.slot(tenant).await? {
            Slot::Active(session) => {
                self.timers.arm(
                    &self.key(tenant),
                    session.expires_at,
                    Arc::clone(&self.store),
                    self.events.clone(),
                );
                info!(tenant = %tenant, kind = %R::KIND, session_id = %session.session_id, "booking session restored");
                Ok(Some(session))
            }
            _ => Ok(None),
        }
    }

    pub async fn reservation(&self, reference: &str) -> Result<ReservationRecord, BookingError> {
        Ok(self.gateway.get_reservation(reference).await?)
    }

    pub async fn cancel_reservation(
        &self,
        reference: &str,
    ) -> Result<CancellationOutcome, BookingError> {
        Ok(self.gateway.cancel_reservation(reference).await?)
    }

    /// The single validity check behind every entry point: a missing key is
    /// a vacant slot, an unparseable payload is cleared and vacant, an
    /// expired session is cleaned up eagerly.
    async fn slot(&self, tenant: &TenantId) -> Result<Slot<R>, BookingError> {
        let key = self.key(tenant);
        let Some(payload) = self.store.get(&key).await? else {
            return Ok(Slot::Vacant);
        };
        let session = match serde_json::from_str::<BookingSession<R>>(&payload) {
            Ok(session) => session,
            Err(err) => {
                warn!(key = %key.storage_key(), error = %err, "stored session unreadable, clearing");
                self.store.delete(&key).await?;
                return Ok(Slot::Vacant);
            }
        };
        if session.is_expired() {
            self.timers.clear(&key);
            self.store.delete(&key).await?;
            info!(tenant = %tenant, kind = %R::KIND, session_id = %session.session_id, "session expired");
            let _ = self.events.send(EngineEvent::SessionExpired {
                kind: key.kind,
                tenant: tenant.clone(),
                session_id: session.session_id,
            });
            return Ok(Slot::Expired);
        }
        Ok(Slot::Active(session))
    }

    async fn active(&self, tenant: &TenantId) -> Result<BookingSession<R>, BookingError> {
        match self.slot(tenant).await? {
            Slot::Active(session) => Ok(session),
            Slot::Expired => Err(BookingError::SessionExpired),
            Slot::Vacant => Err(BookingError::NoActiveSession(R::KIND.into())),
        }
    }

    async fn persist(&self, tenant: &TenantId, session: &BookingSession<R>) -> Result<(), BookingError> {
        let payload = serde_json::to_string(session)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store
            .put(&self.key(tenant), &payload, session.remaining_ttl())
            .await?;
        Ok(())
    }

    /// Hand the confirmation to the itinerary recorder without waiting on it.
    /// The reservation already succeeded; a recorder failure is logged and
    /// published as an event, never surfaced to the caller.
    fn record_itinerary(&self, session: &BookingSession<R>, confirmation: &BookingConfirmation) {
        let entry = ItineraryEntry {
            confirmation: confirmation.clone(),
            window: R::travel_window(&session.criteria),
        };
        let recorder = Arc::clone(&self.recorder);
        let events = self.events.clone();
        tokio::spawn(async move {
            let confirmation_number = entry.confirmation.confirmation_number.clone();
            if let Err(err) = recorder.add_booking(entry).await {
                warn!(confirmation = %confirmation_number, error = %err, "itinerary recording failed; booking remains confirmed");
                let _ = events.send(EngineEvent::RecorderFailure {
                    confirmation_number,
                    error: err.to_string(),
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::Ordering;
    use wayfare_core::store::SessionKind;
    use wayfare_provider::fallback::{FallbackConfig, FlightSynthesizer, HotelSynthesizer};
    use wayfare_store::MemoryStore;

    use crate::events::event_channel;
    use crate::recorder::{ItineraryEntry, MemoryRecorder};
    use crate::session::SESSION_TTL;
    use crate::testutil::{
        flight_criteria, flight_details, flight_offer, hotel_criteria, hotel_details, hotel_offer,
        payment, tenant, ScriptedGateway,
    };

    struct Harness {
        manager: FlightSessionManager,
        gateway: Arc<ScriptedGateway>,
        store: Arc<MemoryStore>,
        _events: broadcast::Receiver<EngineEvent>,
    }

    fn flight_harness(ttl: Duration) -> Harness {
        let gateway = Arc::new(ScriptedGateway::default());
        let store = Arc::new(MemoryStore::new());
        let (tx, rx) = event_channel(64);
        let manager = ResourceSessionManager::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            Arc::clone(&gateway) as Arc<dyn InventoryProvider<FlightResource>>,
            Arc::new(FlightSynthesizer::new(FallbackConfig {
                price_change_probability: 0.0,
                max_drift_ratio: 0.10,
            })),
            Arc::new(MemoryRecorder::new()),
            tx,
            ttl,
        );
        Harness {
            manager,
            gateway,
            store,
            _events: rx,
        }
    }

    fn hotel_harness() -> (HotelSessionManager, Arc<ScriptedGateway>) {
        let gateway = Arc::new(ScriptedGateway::default());
        let (tx, _rx) = event_channel(64);
        let manager = ResourceSessionManager::new(
            Arc::new(MemoryStore::new()),
            Arc::clone(&gateway) as Arc<dyn InventoryProvider<HotelResource>>,
            Arc::new(HotelSynthesizer::default()),
            Arc::new(MemoryRecorder::new()),
            tx,
            SESSION_TTL,
        );
        (manager, gateway)
    }

    fn store_key() -> SessionKey {
        SessionKey::new(tenant(), SessionKind::Flight)
    }

    /// Rewrites the persisted session so its TTL elapsed in the past.
    async fn force_expiry(store: &MemoryStore) {
        let payload = store.get(&store_key()).await.unwrap().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        value["expires_at"] = serde_json::json!(Utc::now() - chrono::Duration::minutes(1));
        store
            .put(&store_key(), &value.to_string(), Duration::from_secs(60))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_start_then_current_is_details_and_unexpired() {
        let h = flight_harness(SESSION_TTL);
        h.manager
            .start(&tenant(), flight_offer(1100), flight_criteria())
            .await
            .unwrap();

        let session = h.manager.current(&tenant()).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Details);
        assert!(Utc::now() < session.expires_at);
    }

    #[tokio::test]
    async fn test_expired_session_reads_absent_and_clears_store() {
        let h = flight_harness(SESSION_TTL);
        h.manager
            .start(&tenant(), flight_offer(1100), flight_criteria())
            .await
            .unwrap();
        force_expiry(&h.store).await;

        assert!(h.manager.current(&tenant()).await.unwrap().is_none());
        assert!(h.store.get(&store_key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_on_expired_session_fails_with_session_expired() {
        let h = flight_harness(SESSION_TTL);
        h.manager
            .start(&tenant(), flight_offer(1100), flight_criteria())
            .await
            .unwrap();
        force_expiry(&h.store).await;

        let err = h
            .manager
            .update(
                &tenant(),
                SessionUpdate {
                    status: Some(SessionStatus::Payment),
                    revalidation: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::SessionExpired));
        assert!(h.store.get(&store_key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_complete_without_revalidation_never_reaches_provider() {
        let h = flight_harness(SESSION_TTL);
        h.manager
            .start(&tenant(), flight_offer(1100), flight_criteria())
            .await
            .unwrap();

        let err = h
            .manager
            .complete_booking(&tenant(), flight_details(), payment())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::RevalidationRequired));
        assert_eq!(h.gateway.book_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unchanged_reprice_reports_equal_prices() {
        let h = flight_harness(SESSION_TTL);
        h.manager
            .start(&tenant(), flight_offer(1100), flight_criteria())
            .await
            .unwrap();

        let result = h.manager.revalidate_price(&tenant()).await.unwrap();
        assert!(!result.price_changed);
        assert_eq!(result.current_price, result.original_price);
    }

    #[tokio::test]
    async fn test_finalize_failure_leaves_session_byte_identical() {
        let h = flight_harness(SESSION_TTL);
        h.manager
            .start(&tenant(), flight_offer(1100), flight_criteria())
            .await
            .unwrap();
        h.manager.revalidate_price(&tenant()).await.unwrap();

        let before = h.store.get(&store_key()).await.unwrap().unwrap();
        h.gateway.fail_book.store(true, Ordering::SeqCst);
        let err = h
            .manager
            .complete_booking(&tenant(), flight_details(), payment())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Provider(_)));

        let after = h.store.get(&store_key()).await.unwrap().unwrap();
        assert_eq!(before, after);

        // Same state, same lock code: the retry succeeds.
        h.gateway.fail_book.store(false, Ordering::SeqCst);
        let confirmation = h
            .manager
            .complete_booking(&tenant(), flight_details(), payment())
            .await
            .unwrap();
        assert_eq!(confirmation.confirmation_number, "CONF-1");
    }

    #[tokio::test]
    async fn test_price_change_flow_books_with_revalidated_lock_code() {
        let (manager, gateway) = hotel_harness();
        *gateway.reprice_amount.lock() = Some(1650);
        manager
            .start(&tenant(), hotel_offer(1500), hotel_criteria())
            .await
            .unwrap();

        let result = manager.revalidate_price(&tenant()).await.unwrap();
        assert!(result.price_changed);
        assert_eq!(result.original_price.amount, 1500);
        assert_eq!(result.current_price.amount, 1650);

        let session = manager.current(&tenant()).await.unwrap().unwrap();
        assert_eq!(session.lock_code, "RV-LOCK-1");

        // The caller acknowledged the new price; finalize must use the
        // revalidated lock code, not the original rate key.
        let confirmation = manager
            .complete_booking(&tenant(), hotel_details(), payment())
            .await
            .unwrap();
        assert_eq!(confirmation.total.amount, 1650);
        assert_eq!(
            gateway.last_book_lock_code.lock().as_deref(),
            Some("RV-LOCK-1")
        );
    }

    #[tokio::test]
    async fn test_unavailable_offer_surfaces_and_preserves_session() {
        let (manager, gateway) = hotel_harness();
        gateway.unavailable.store(true, Ordering::SeqCst);
        manager
            .start(&tenant(), hotel_offer(1500), hotel_criteria())
            .await
            .unwrap();

        let err = manager.revalidate_price(&tenant()).await.unwrap_err();
        assert!(matches!(err, BookingError::ResourceUnavailable));

        let session = manager.current(&tenant()).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Details);
        assert!(session.revalidation.is_none());
    }

    #[tokio::test]
    async fn test_revalidation_network_error_degrades_without_mutating_status() {
        let h = flight_harness(SESSION_TTL);
        h.gateway.fail_revalidate.store(true, Ordering::SeqCst);
        h.manager
            .start(&tenant(), flight_offer(1100), flight_criteria())
            .await
            .unwrap();

        let result = h.manager.revalidate_price(&tenant()).await.unwrap();
        assert!(result.synthetic);
        assert!(result.available);

        let session = h.manager.current(&tenant()).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Details);
    }

    #[tokio::test]
    async fn test_search_degrades_to_synthetic_inventory() {
        let h = flight_harness(SESSION_TTL);
        h.gateway.fail_search.store(true, Ordering::SeqCst);

        let offers = h.manager.search(&flight_criteria()).await.unwrap();
        assert!(!offers.is_empty());
        assert!(offers.iter().all(|o| o.synthetic));
    }

    #[tokio::test]
    async fn test_search_rejects_invalid_criteria() {
        let h = flight_harness(SESSION_TTL);
        let mut criteria = flight_criteria();
        criteria.adults = 0;
        let err = h.manager.search(&criteria).await.unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let h = flight_harness(SESSION_TTL);
        assert!(h.manager.cancel(&tenant()).await.is_ok());

        h.manager
            .start(&tenant(), flight_offer(1100), flight_criteria())
            .await
            .unwrap();
        h.manager.cancel(&tenant()).await.unwrap();
        assert!(h.manager.current(&tenant()).await.unwrap().is_none());
        assert!(h.manager.cancel(&tenant()).await.is_ok());
    }

    #[tokio::test]
    async fn test_start_supersedes_previous_session() {
        let h = flight_harness(SESSION_TTL);
        let first = h
            .manager
            .start(&tenant(), flight_offer(1100), flight_criteria())
            .await
            .unwrap();
        let second = h
            .manager
            .start(&tenant(), flight_offer(900), flight_criteria())
            .await
            .unwrap();
        assert_ne!(first.session_id, second.session_id);

        let current = h.manager.current(&tenant()).await.unwrap().unwrap();
        assert_eq!(current.session_id, second.session_id);
    }

    #[tokio::test]
    async fn test_restore_round_trips_and_clears_corrupt_payloads() {
        let h = flight_harness(SESSION_TTL);
        let started = h
            .manager
            .start(&tenant(), flight_offer(1100), flight_criteria())
            .await
            .unwrap();

        let restored = h.manager.restore(&tenant()).await.unwrap().unwrap();
        assert_eq!(restored.session_id, started.session_id);
        assert_eq!(restored.expires_at, started.expires_at);

        h.store
            .put(&store_key(), "not json", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(h.manager.restore(&tenant()).await.unwrap().is_none());
        assert!(h.store.get(&store_key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_timer_clears_expired_session_proactively() {
        let h = flight_harness(Duration::from_millis(50));
        h.manager
            .start(&tenant(), flight_offer(1100), flight_criteria())
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;
        // No read happened; the timer alone cleared the slot.
        assert!(h.store.get(&store_key()).await.unwrap().is_none());
    }

    struct FailingRecorder;

    #[async_trait::async_trait]
    impl ItineraryRecorder for FailingRecorder {
        async fn add_booking(
            &self,
            _entry: ItineraryEntry,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err("itinerary service down".into())
        }
    }

    #[tokio::test]
    async fn test_recorder_failure_is_swallowed_but_observable() {
        let gateway = Arc::new(ScriptedGateway::default());
        let store = Arc::new(MemoryStore::new());
        let (tx, mut rx) = event_channel(64);
        let manager: FlightSessionManager = ResourceSessionManager::new(
            store,
            Arc::clone(&gateway) as Arc<dyn InventoryProvider<FlightResource>>,
            Arc::new(FlightSynthesizer::default()),
            Arc::new(FailingRecorder),
            tx,
            SESSION_TTL,
        );

        manager
            .start(&tenant(), flight_offer(1100), flight_criteria())
            .await
            .unwrap();
        manager.revalidate_price(&tenant()).await.unwrap();
        let confirmation = manager
            .complete_booking(&tenant(), flight_details(), payment())
            .await
            .unwrap();
        assert_eq!(confirmation.confirmation_number, "CONF-1");

        let failure = tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                match rx.recv().await {
                    Ok(EngineEvent::RecorderFailure { error, .. }) => break error,
                    Ok(_) => continue,
                    Err(err) => panic!("event channel closed: {}", err),
                }
            }
        })
        .await
        .expect("no recorder failure event observed");
        assert!(failure.contains("itinerary service down"));
    }
}
