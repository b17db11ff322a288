//! The booking state machine.
//!
//! ```text
//! pending --accept (owning chef)--> confirmed
//! pending --decline (owning chef)--> declined
//! pending --cancel (owning client)--> cancelled
//! ```
//!
//! Every other combination is rejected. Transitions never mutate their input:
//! callers get a new snapshot and keep the old one for rollback.

use chrono::{DateTime, Utc};

use crate::{Action, Actor, Booking, BookingStatus, EngineError, ResultEngine};

/// Validate `action` by `actor` on `booking` and return the resulting snapshot.
///
/// The status is checked before ownership, so a finished booking reports
/// [`EngineError::InvalidTransition`] whoever asks.
pub fn apply_transition(
    booking: &Booking,
    actor: &Actor,
    action: Action,
    at: DateTime<Utc>,
) -> ResultEngine<Booking> {
    if booking.status != action.source() {
        return Err(EngineError::InvalidTransition {
            from: booking.status,
            action,
        });
    }

    let required = action.required_role();
    if actor.role != required {
        return Err(EngineError::UnauthorizedAction(format!(
            "only the {required} can {action} a booking"
        )));
    }
    if !booking.is_owned_by(actor) {
        return Err(EngineError::UnauthorizedAction(format!(
            "{} {} does not own booking {}",
            actor.role, actor.id, booking.id
        )));
    }

    Ok(Booking {
        status: action.target(),
        updated_at: at,
        ..booking.clone()
    })
}

/// Look up a booking by id in the caller's current view.
pub fn find_booking<'a>(bookings: &'a [Booking], id: &str) -> ResultEngine<&'a Booking> {
    bookings
        .iter()
        .find(|booking| booking.id == id)
        .ok_or_else(|| EngineError::NotFound(id.to_string()))
}

/// Actions `actor` may request on `booking` right now.
pub fn available_actions(booking: &Booking, actor: &Actor) -> Vec<Action> {
    if booking.status != BookingStatus::Pending || !booking.is_owned_by(actor) {
        return Vec::new();
    }
    Action::ALL
        .into_iter()
        .filter(|action| action.required_role() == actor.role)
        .collect()
}
