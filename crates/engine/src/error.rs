//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidInput`] thrown when a booking draft or rate/hours pair is malformed.
//! - [`UnauthorizedAction`] thrown when the actor does not own the booking in
//!   the role the action requires.
//! - [`InvalidTransition`] thrown when the booking is not in a status that
//!   permits the action.
//! - [`NotFound`] thrown when a booking id is unknown to the current view.
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`UnauthorizedAction`]: EngineError::UnauthorizedAction
//!  [`InvalidTransition`]: EngineError::InvalidTransition
//!  [`NotFound`]: EngineError::NotFound
use thiserror::Error;

use crate::{Action, BookingStatus};

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unauthorized action: {0}")]
    UnauthorizedAction(String),
    #[error("Cannot {action} a {from} booking")]
    InvalidTransition { from: BookingStatus, action: Action },
    #[error("\"{0}\" booking not found!")]
    NotFound(String),
}
