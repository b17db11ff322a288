use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use chrono::Utc;
use engine::{Booking, BookingStatus, NewBooking, Role};
use uuid::Uuid;

use super::{BookingRepository, RepositoryError};

/// In-process [`BookingRepository`].
///
/// Clones share the same records, so a test can keep a handle to inspect
/// what the store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    bookings: Arc<Mutex<Vec<Booking>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing records.
    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: Arc::new(Mutex::new(bookings)),
            ..Self::default()
        }
    }

    /// While set, every call fails with [`RepositoryError::Server`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Copy of the stored records, in insertion order.
    pub fn snapshot(&self) -> Vec<Booking> {
        self.records().clone()
    }

    fn records(&self) -> MutexGuard<'_, Vec<Booking>> {
        self.bookings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Server("repository unavailable".to_string()));
        }
        Ok(())
    }
}

impl BookingRepository for MemoryRepository {
    async fn list_bookings(
        &self,
        role: Role,
        actor_id: &str,
    ) -> Result<Vec<Booking>, RepositoryError> {
        self.check_available()?;
        Ok(self
            .records()
            .iter()
            .filter(|booking| match role {
                Role::Client => booking.client_id == actor_id,
                Role::Chef => booking.chef_id == actor_id,
            })
            .cloned()
            .collect())
    }

    async fn create_booking(
        &self,
        client_id: &str,
        payload: &NewBooking,
    ) -> Result<Booking, RepositoryError> {
        self.check_available()?;
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            client_id: client_id.to_string(),
            chef_id: payload.chef_id.clone(),
            client_name: None,
            chef_name: payload.chef_name.clone(),
            cuisine: payload.cuisine.clone(),
            date: payload.date,
            start_time: payload.start_time,
            hours: payload.hours,
            location: payload.location.clone(),
            guests: payload.guests,
            special_requests: payload.special_requests.clone(),
            hourly_rate: payload.hourly_rate,
            total: payload.total,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.records().push(booking.clone());
        Ok(booking)
    }

    async fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<Booking, RepositoryError> {
        self.check_available()?;
        let mut records = self.records();
        let booking = records
            .iter_mut()
            .find(|booking| booking.id == booking_id)
            .ok_or(RepositoryError::NotFound)?;
        if booking.status != BookingStatus::Pending {
            return Err(RepositoryError::Conflict(format!(
                "booking {booking_id} is already {}",
                booking.status
            )));
        }
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn delete_booking(&self, booking_id: &str) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut records = self.records();
        let before = records.len();
        records.retain(|booking| booking.id != booking_id);
        if records.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
