//! The remote booking service, seen from the client.
//!
//! [`BookingRepository`] is the only way the store reaches persistence.
//! [`HttpRepository`] talks to the REST API; [`MemoryRepository`] keeps
//! everything in process and backs the tests.

use std::future::Future;

use engine::{Booking, BookingStatus, NewBooking, Role};
use thiserror::Error;

pub use http::HttpRepository;
pub use memory::MemoryRepository;

mod http;
mod memory;

/// Failures reported by a repository. Never retried by the store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("not authenticated")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("booking not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("rejected: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(String),
}

pub trait BookingRepository: Send + Sync {
    /// Bookings created by a client, or addressed to a chef.
    fn list_bookings(
        &self,
        role: Role,
        actor_id: &str,
    ) -> impl Future<Output = Result<Vec<Booking>, RepositoryError>> + Send;

    /// Store a new booking on behalf of `client_id`. The returned booking
    /// carries the id assigned by the repository.
    fn create_booking(
        &self,
        client_id: &str,
        payload: &NewBooking,
    ) -> impl Future<Output = Result<Booking, RepositoryError>> + Send;

    fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> impl Future<Output = Result<Booking, RepositoryError>> + Send;

    fn delete_booking(
        &self,
        booking_id: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
