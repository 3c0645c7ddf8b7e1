pub mod confirmation;
pub mod criteria;
pub mod error;
pub mod money;
pub mod offer;
pub mod party;
pub mod provider;
pub mod resource;
pub mod store;

pub use confirmation::{BookingConfirmation, ReservationRecord};
pub use criteria::{CabinClass, FlightSearchCriteria, HotelSearchCriteria, TravelWindow};
pub use error::{BookingError, BookingResult};
pub use money::Price;
pub use offer::{FlightOffer, HotelOffer, MealPlan};
pub use party::{FlightDetails, HotelDetails, HotelGuest, PassengerType, PaymentInfo, Traveler};
pub use provider::{
    CancellationOutcome, InventoryProvider, ProviderError, ReservationRequest, RevalidationOutcome,
};
pub use resource::{BookableResource, FlightResource, HotelResource, ResourceKind};
pub use store::{SessionKey, SessionKind, SessionStore, StoreError, TenantId};
