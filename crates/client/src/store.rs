//! In-memory view of the session user's bookings.
//!
//! The collection is the source of truth for rendering. Each operation either
//! leaves it fully updated or unchanged (rolled back), and it never holds two
//! bookings with the same id.
//!
//! The lock is never held across a repository call, so loads and mutations
//! can be in flight together. Loads, transitions and creations share one
//! sequence, numbered when issued. A load response is applied only if no
//! later-issued load has been applied already, and it never overwrites a
//! booking mutated by a request issued after the load.

use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};

use chrono::Utc;
use engine::{
    Action, Actor, Booking, BookingStatus, BookingSummary, EngineError, MoneyCents, NewBooking,
    Role, apply_transition, find_booking,
};
use serde::Deserialize;

use crate::{
    error::{Result, StoreError},
    repository::BookingRepository,
};

/// How a client cancellation is persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelMode {
    /// `PATCH` the status to `cancelled`.
    #[default]
    Status,
    /// Delete the remote record. The local copy stays, as `cancelled`.
    Delete,
}

impl FromStr for CancelMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(Self::Status),
            "delete" => Ok(Self::Delete),
            other => Err(format!("invalid cancel mode: {other}")),
        }
    }
}

/// What happened to a load response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The collection was replaced; holds the number of bookings.
    Applied(usize),
    /// A later-issued load was applied first; this response was dropped.
    Superseded,
}

#[derive(Debug, Default)]
struct StoreState {
    bookings: Vec<Booking>,
    /// Sequence number of the load the collection comes from.
    applied_load: u64,
    /// Booking id -> sequence number of the last local mutation.
    mutated: HashMap<String, u64>,
    last_error: Option<String>,
}

impl StoreState {
    fn get(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id == id)
    }

    /// Replace the entry with the same id, if any.
    fn replace(&mut self, booking: Booking) {
        if let Some(slot) = self.bookings.iter_mut().find(|current| current.id == booking.id) {
            *slot = booking;
        }
    }

    fn upsert(&mut self, booking: Booking) {
        match self.bookings.iter_mut().find(|current| current.id == booking.id) {
            Some(slot) => *slot = booking,
            None => self.bookings.push(booking),
        }
    }

    /// Replace the collection with the response of load `seq`.
    ///
    /// Bookings mutated by a request issued after the load keep their local
    /// value; they are appended if the response does not list them.
    fn apply_load(&mut self, seq: u64, loaded: Vec<Booking>) -> usize {
        let mut bookings = dedup_by_id(loaded);

        let mut newer: Vec<(u64, &String)> = self
            .mutated
            .iter()
            .filter(|&(_, &mutation)| mutation > seq)
            .map(|(id, &mutation)| (mutation, id))
            .collect();
        newer.sort_unstable();
        for (_, id) in newer {
            let Some(local) = self.get(id).cloned() else {
                continue;
            };
            match bookings.iter_mut().find(|booking| booking.id == local.id) {
                Some(slot) => *slot = local,
                None => bookings.push(local),
            }
        }

        self.mutated.retain(|_, mutation| *mutation > seq);
        self.bookings = bookings;
        self.applied_load = seq;
        self.last_error = None;
        self.bookings.len()
    }

    fn fail<T>(&mut self, err: impl Into<StoreError>) -> Result<T> {
        let err = err.into();
        self.last_error = Some(err.to_string());
        Err(err)
    }
}

/// Decrements the in-flight counter when the load finishes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct BookingStore<R> {
    repository: R,
    actor: Actor,
    cancel_mode: CancelMode,
    state: Mutex<StoreState>,
    issued: AtomicU64,
    loads_in_flight: AtomicUsize,
}

impl<R> fmt::Debug for BookingStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingStore")
            .field("actor", &self.actor)
            .field("cancel_mode", &self.cancel_mode)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<R: BookingRepository> BookingStore<R> {
    /// An empty store for `actor`'s session. Call [`load`](Self::load) to fill it.
    pub fn new(repository: R, actor: Actor) -> Self {
        Self {
            repository,
            actor,
            cancel_mode: CancelMode::default(),
            state: Mutex::new(StoreState::default()),
            issued: AtomicU64::new(0),
            loads_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_cancel_mode(mut self, cancel_mode: CancelMode) -> Self {
        self.cancel_mode = cancel_mode;
        self
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_seq(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Fetch the session actor's bookings and replace the collection.
    ///
    /// A client sees the bookings they created, a chef the bookings addressed
    /// to them. Responses of loads issued before the one currently applied
    /// are discarded, errors included. Bookings changed by a transition or
    /// creation issued after this load keep their local value.
    pub async fn load(&self) -> Result<LoadOutcome> {
        let seq = self.next_seq();
        let _in_flight = InFlight::enter(&self.loads_in_flight);

        let response = self
            .repository
            .list_bookings(self.actor.role, &self.actor.id)
            .await;

        let mut state = self.state();
        if seq <= state.applied_load {
            tracing::debug!(
                "discarding load #{seq}, load #{} already applied",
                state.applied_load
            );
            return Ok(LoadOutcome::Superseded);
        }

        match response {
            Ok(bookings) => {
                let count = state.apply_load(seq, bookings);
                tracing::debug!("load #{seq} applied: {count} bookings");
                Ok(LoadOutcome::Applied(count))
            }
            Err(err) => {
                tracing::warn!("load #{seq} failed: {err}");
                state.fail(err)
            }
        }
    }

    /// Apply `action` locally, then persist it.
    ///
    /// Illegal intents fail before any repository call. The repository
    /// response replaces the entry unless a load issued later has been applied
    /// meanwhile. If the repository rejects the change the previous snapshot
    /// is restored, unless the entry was replaced in the meantime.
    pub async fn request_transition(&self, booking_id: &str, action: Action) -> Result<Booking> {
        let (seq, previous, optimistic) = {
            let mut state = self.state();
            let transition = find_booking(&state.bookings, booking_id).and_then(|current| {
                apply_transition(current, &self.actor, action, Utc::now())
                    .map(|next| (current.clone(), next))
            });
            let (previous, optimistic) = match transition {
                Ok(pair) => pair,
                Err(err) => return state.fail(err),
            };
            let seq = self.next_seq();
            state.mutated.insert(optimistic.id.clone(), seq);
            state.replace(optimistic.clone());
            (seq, previous, optimistic)
        };
        tracing::info!(
            "{} {} requested {action} on booking {booking_id}",
            self.actor.role,
            self.actor.id
        );

        let persisted = match (action, self.cancel_mode) {
            (Action::Cancel, CancelMode::Delete) => self
                .repository
                .delete_booking(booking_id)
                .await
                .map(|()| None),
            _ => self
                .repository
                .update_booking_status(booking_id, optimistic.status)
                .await
                .map(Some),
        };

        let mut state = self.state();
        match persisted {
            Ok(remote) => {
                let booking = remote.unwrap_or(optimistic);
                if state.mutated.get(booking_id) == Some(&seq) {
                    state.replace(booking.clone());
                } else {
                    tracing::debug!(
                        "{action} on booking {booking_id} superseded by a newer load"
                    );
                }
                tracing::info!("booking {booking_id} is now {}", booking.status);
                Ok(booking)
            }
            Err(err) => {
                if state.get(booking_id) == Some(&optimistic) {
                    state.replace(previous);
                    tracing::warn!("rolled back {action} on booking {booking_id}: {err}");
                } else {
                    tracing::warn!("{action} on booking {booking_id} failed: {err}");
                }
                state.fail(err)
            }
        }
    }

    /// Send a new booking request and add the stored booking to the collection.
    pub async fn create(&self, draft: NewBooking) -> Result<Booking> {
        if self.actor.role != Role::Client {
            return self.state().fail(EngineError::UnauthorizedAction(
                "only a client can create a booking".to_string(),
            ));
        }
        if let Err(err) = draft.validate() {
            return self.state().fail(err);
        }

        let seq = self.next_seq();
        let created = self.repository.create_booking(&self.actor.id, &draft).await;

        let mut state = self.state();
        match created {
            Ok(booking) => {
                tracing::info!(
                    "created booking {} with chef {} for {}",
                    booking.id,
                    booking.chef_id,
                    booking.total
                );
                state.mutated.insert(booking.id.clone(), seq);
                state.upsert(booking.clone());
                Ok(booking)
            }
            Err(err) => {
                tracing::warn!("booking request to chef {} failed: {err}", draft.chef_id);
                state.fail(err)
            }
        }
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.state().bookings.clone()
    }

    pub fn booking(&self, id: &str) -> Option<Booking> {
        self.state().get(id).cloned()
    }

    pub fn filter_by_status(&self, status: Option<BookingStatus>) -> Vec<Booking> {
        engine::filter_by_status(&self.state().bookings, status)
    }

    pub fn total_earnings(&self) -> MoneyCents {
        engine::total_earnings(&self.state().bookings)
    }

    pub fn summary(&self) -> BookingSummary {
        engine::summarize(&self.state().bookings)
    }

    /// Actions the session actor may request on a booking.
    pub fn available_actions(&self, id: &str) -> Result<Vec<Action>> {
        let state = self.state();
        let booking = find_booking(&state.bookings, id)?;
        Ok(engine::available_actions(booking, &self.actor))
    }

    pub fn is_loading(&self) -> bool {
        self.loads_in_flight.load(Ordering::SeqCst) > 0
    }

    /// Message of the last error surfaced by an operation.
    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    pub fn clear_error(&self) {
        self.state().last_error = None;
    }
}

/// Collapse repeated ids: the last copy wins, the first position is kept.
fn dedup_by_id(bookings: Vec<Booking>) -> Vec<Booking> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(bookings.len());
    let mut unique: Vec<Booking> = Vec::with_capacity(bookings.len());
    for booking in bookings {
        match positions.get(&booking.id) {
            Some(&index) => unique[index] = booking,
            None => {
                positions.insert(booking.id.clone(), unique.len());
                unique.push(booking);
            }
        }
    }
    unique
}
