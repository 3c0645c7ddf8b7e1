pub mod fallback;
pub mod flight;
pub mod hotel;
mod transport;

pub use fallback::{FallbackConfig, FlightSynthesizer, HotelSynthesizer};
pub use flight::HttpFlightGateway;
pub use hotel::HttpHotelGateway;
