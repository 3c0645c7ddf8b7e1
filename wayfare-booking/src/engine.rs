use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use wayfare_core::error::BookingError;
use wayfare_core::provider::InventoryProvider;
use wayfare_core::resource::{FlightResource, HotelResource};
use wayfare_core::store::SessionStore;
use wayfare_provider::fallback::{FallbackConfig, FlightSynthesizer, HotelSynthesizer};
use wayfare_provider::{HttpFlightGateway, HttpHotelGateway};
use wayfare_store::{Config, RedisStore};

use crate::combined::CombinedOrchestrator;
use crate::events::{event_channel, EngineEvent};
use crate::manager::{FlightSessionManager, HotelSessionManager, ResourceSessionManager};
use crate::recorder::ItineraryRecorder;

/// Everything the engine composes over. Both managers and the orchestrator
/// share the store, recorder and event channel.
pub struct EngineDeps {
    pub store: Arc<dyn SessionStore>,
    pub flight_gateway: Arc<dyn InventoryProvider<FlightResource>>,
    pub flight_fallback: Arc<dyn InventoryProvider<FlightResource>>,
    pub hotel_gateway: Arc<dyn InventoryProvider<HotelResource>>,
    pub hotel_fallback: Arc<dyn InventoryProvider<HotelResource>>,
    pub recorder: Arc<dyn ItineraryRecorder>,
    pub session_ttl: Duration,
}

/// Facade bundling the two resource session managers and the combined
/// orchestrator behind one construction point.
pub struct BookingEngine {
    pub flights: Arc<FlightSessionManager>,
    pub hotels: Arc<HotelSessionManager>,
    pub trips: CombinedOrchestrator,
    events: broadcast::Sender<EngineEvent>,
}

impl BookingEngine {
    pub fn new(deps: EngineDeps) -> Self {
        let (events, _) = event_channel(256);
        let flights = Arc::new(ResourceSessionManager::new(
            Arc::clone(&deps.store),
            deps.flight_gateway,
            deps.flight_fallback,
            Arc::clone(&deps.recorder),
            events.clone(),
            deps.session_ttl,
        ));
        let hotels = Arc::new(ResourceSessionManager::new(
            Arc::clone(&deps.store),
            deps.hotel_gateway,
            deps.hotel_fallback,
            deps.recorder,
            events.clone(),
            deps.session_ttl,
        ));
        let trips = CombinedOrchestrator::new(
            Arc::clone(&flights),
            Arc::clone(&hotels),
            deps.store,
            events.clone(),
            deps.session_ttl,
        );
        Self {
            flights,
            hotels,
            trips,
            events,
        }
    }

    /// Wire the engine from the layered configuration: HTTP gateways against
    /// the configured providers, synthetic fallbacks, and a Redis-backed
    /// session store.
    pub fn from_config(
        config: &Config,
        recorder: Arc<dyn ItineraryRecorder>,
    ) -> Result<Self, BookingError> {
        let timeout = Duration::from_millis(config.providers.timeout_ms);
        let flight_gateway = HttpFlightGateway::new(
            config.providers.flight_base_url.clone(),
            config.providers.api_key.clone(),
            timeout,
        )?;
        let hotel_gateway = HttpHotelGateway::new(
            config.providers.hotel_base_url.clone(),
            config.providers.api_key.clone(),
            timeout,
        )?;
        let fallback = FallbackConfig {
            price_change_probability: config.business_rules.price_change_probability,
            ..FallbackConfig::default()
        };
        let store = RedisStore::new(&config.redis.url)?;

        Ok(Self::new(EngineDeps {
            store: Arc::new(store),
            flight_gateway: Arc::new(flight_gateway),
            flight_fallback: Arc::new(FlightSynthesizer::new(fallback.clone())),
            hotel_gateway: Arc::new(hotel_gateway),
            hotel_fallback: Arc::new(HotelSynthesizer::new(fallback)),
            recorder,
            session_ttl: Duration::from_secs(config.business_rules.session_ttl_seconds),
        }))
    }

    /// Subscribe to engine events (expiries, fallbacks, swallowed recorder
    /// failures).
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }
}
