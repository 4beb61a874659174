pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::{DecodeError, EncodeError};
pub use models::location::{Location, LocationReading};
pub use models::pin::{Pin, PinBuilder};
pub use services::location_notifier::{LatestLocation, LocationFeed, LocationUpdateNotifier};
