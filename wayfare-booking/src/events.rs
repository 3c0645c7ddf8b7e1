use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use wayfare_core::resource::ResourceKind;
use wayfare_core::store::{SessionKind, TenantId};

/// In-process engine events. Failures the engine deliberately swallows
/// (recorder errors, provider fallbacks) surface here so observers see them
/// without the callers having to.
#[derive(Debug, Clone, Serialize)]
pub enum EngineEvent {
    SessionStarted {
        kind: SessionKind,
        tenant: TenantId,
        session_id: Uuid,
    },
    SessionExpired {
        kind: SessionKind,
        tenant: TenantId,
        session_id: Uuid,
    },
    SessionCancelled {
        kind: SessionKind,
        tenant: TenantId,
    },
    FallbackEngaged {
        kind: ResourceKind,
        operation: &'static str,
    },
    BookingConfirmed {
        kind: ResourceKind,
        tenant: TenantId,
        confirmation_number: String,
        synthetic: bool,
    },
    RecorderFailure {
        confirmation_number: String,
        error: String,
    },
}

pub fn event_channel(capacity: usize) -> (broadcast::Sender<EngineEvent>, broadcast::Receiver<EngineEvent>) {
    broadcast::channel(capacity)
}
