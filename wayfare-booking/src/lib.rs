pub mod combined;
pub mod engine;
pub mod events;
pub mod manager;
pub mod recorder;
pub mod session;
#[cfg(test)]
pub(crate) mod testutil;
mod timer;

pub use combined::{
    CombinedConfirmation, CombinedError, CombinedOrchestrator, CombinedSession,
    CompensationOutcome, FlightSelection, HotelSelection, TripDetails, TripLegs, TripSelection,
};
pub use engine::{BookingEngine, EngineDeps};
pub use events::{event_channel, EngineEvent};
pub use manager::{
    FlightSessionManager, HotelSessionManager, ResourceSessionManager, SessionUpdate,
};
pub use recorder::{ItineraryEntry, ItineraryRecorder, MemoryRecorder, NoopRecorder};
pub use session::{BookingSession, RevalidationResult, SessionStatus, SESSION_TTL};
