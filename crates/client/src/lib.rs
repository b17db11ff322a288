//! Client side of the chef marketplace bookings.
//!
//! [`BookingStore`] keeps the session user's bookings in memory, applies
//! intents through the lifecycle rules in [`engine`] and persists them
//! through a [`BookingRepository`].

pub use error::{Result, StoreError};
pub use repository::{BookingRepository, HttpRepository, MemoryRepository, RepositoryError};
pub use store::{BookingStore, CancelMode, LoadOutcome};

mod error;
pub mod repository;
mod store;
