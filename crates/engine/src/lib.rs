//! Booking lifecycle rules for the chef marketplace.
//!
//! The crate is pure: no I/O, no clock reads. It defines the booking entity,
//! the transition table, and the read models derived from a booking list.
//! Persistence and synchronization live behind the repository in
//! `chefbook_client`.

pub use api_types::booking::{BookingStatus, Role};
pub use booking::{
    Action, Actor, Booking, NewBooking, NewBookingBuilder, allowed_transitions, compute_total,
    is_terminal,
};
pub use error::EngineError;
pub use lifecycle::{apply_transition, available_actions, find_booking};
pub use money::MoneyCents;
pub use views::{BookingSummary, filter_by_status, summarize, total_earnings};

mod booking;
mod error;
mod lifecycle;
mod money;
mod views;

pub type ResultEngine<T> = Result<T, EngineError>;
