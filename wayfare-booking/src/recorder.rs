use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use wayfare_core::confirmation::BookingConfirmation;
use wayfare_core::criteria::TravelWindow;

/// A finalized booking filed against the calendar days it spans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryEntry {
    pub confirmation: BookingConfirmation,
    pub window: TravelWindow,
}

/// Downstream itinerary bookkeeping. Append-only and fire-and-forget from
/// the engine's perspective: a recorder failure must never fail the booking
/// that already succeeded.
#[async_trait]
pub trait ItineraryRecorder: Send + Sync {
    async fn add_booking(
        &self,
        entry: ItineraryEntry,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Discards entries; for deployments without an itinerary surface.
pub struct NoopRecorder;

#[async_trait]
impl ItineraryRecorder for NoopRecorder {
    async fn add_booking(
        &self,
        _entry: ItineraryEntry,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

/// Collects entries in memory; used by tests and development runs.
#[derive(Default)]
pub struct MemoryRecorder {
    entries: Mutex<Vec<ItineraryEntry>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<ItineraryEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl ItineraryRecorder for MemoryRecorder {
    async fn add_booking(
        &self,
        entry: ItineraryEntry,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.entries.lock().await.push(entry);
        Ok(())
    }
}
