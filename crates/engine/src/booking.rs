//! Booking primitives.
//!
//! A [`Booking`] is a scheduled engagement between a client and a chef. Its
//! total is fixed when the booking is created and is never recomputed from
//! the chef's current rate.

use std::fmt;

use api_types::booking::{BookingNew, BookingView};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BookingStatus, EngineError, MoneyCents, ResultEngine, Role};

/// Total price of `hours` at `rate`.
///
/// Fails with [`EngineError::InvalidInput`] when `rate <= 0`, `hours < 1` or
/// the product does not fit.
pub fn compute_total(rate: MoneyCents, hours: u32) -> ResultEngine<MoneyCents> {
    if !rate.is_positive() {
        return Err(EngineError::InvalidInput(
            "hourly rate must be > 0".to_string(),
        ));
    }
    if hours < 1 {
        return Err(EngineError::InvalidInput("hours must be >= 1".to_string()));
    }
    rate.checked_mul(hours)
        .ok_or_else(|| EngineError::InvalidInput("total too large".to_string()))
}

/// `true` for statuses that end a booking's lifecycle.
pub fn is_terminal(status: BookingStatus) -> bool {
    matches!(status, BookingStatus::Declined | BookingStatus::Cancelled)
}

/// Statuses `role` may move a booking to from `status`.
pub fn allowed_transitions(status: BookingStatus, role: Role) -> Vec<BookingStatus> {
    Action::ALL
        .into_iter()
        .filter(|action| action.required_role() == role && action.source() == status)
        .map(Action::target)
        .collect()
}

/// An intent on an existing booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Accept,
    Decline,
    Cancel,
}

impl Action {
    pub const ALL: [Action; 3] = [Self::Accept, Self::Decline, Self::Cancel];

    /// The only role allowed to request the action.
    pub fn required_role(self) -> Role {
        match self {
            Self::Accept | Self::Decline => Role::Chef,
            Self::Cancel => Role::Client,
        }
    }

    /// The status a booking must be in for the action to apply.
    pub fn source(self) -> BookingStatus {
        BookingStatus::Pending
    }

    pub fn target(self) -> BookingStatus {
        match self {
            Self::Accept => BookingStatus::Confirmed,
            Self::Decline => BookingStatus::Declined,
            Self::Cancel => BookingStatus::Cancelled,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user on whose behalf an intent is issued.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn client(id: impl Into<String>) -> Self {
        Self::new(id, Role::Client)
    }

    pub fn chef(id: impl Into<String>) -> Self {
        Self::new(id, Role::Chef)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub client_id: String,
    pub chef_id: String,
    pub client_name: Option<String>,
    pub chef_name: Option<String>,
    pub cuisine: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub hours: u32,
    pub location: String,
    pub guests: u32,
    pub special_requests: Option<String>,
    pub hourly_rate: MoneyCents,
    pub total: MoneyCents,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Returns `true` if `actor` is the party the booking names for its role.
    pub fn is_owned_by(&self, actor: &Actor) -> bool {
        match actor.role {
            Role::Client => self.client_id == actor.id,
            Role::Chef => self.chef_id == actor.id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        is_terminal(self.status)
    }
}

impl TryFrom<BookingView> for Booking {
    type Error = EngineError;

    fn try_from(view: BookingView) -> Result<Self, Self::Error> {
        if view.id.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "booking id must not be empty".to_string(),
            ));
        }
        if view.hours < 1 {
            return Err(EngineError::InvalidInput(format!(
                "booking {} has hours < 1",
                view.id
            )));
        }
        if view.hourly_rate_minor < 0 || view.total_minor < 0 {
            return Err(EngineError::InvalidInput(format!(
                "booking {} has a negative amount",
                view.id
            )));
        }
        Ok(Self {
            id: view.id,
            client_id: view.client_id,
            chef_id: view.chef_id,
            client_name: view.client_name,
            chef_name: view.chef_name,
            cuisine: view.cuisine,
            date: view.booking_date,
            start_time: view.start_time,
            hours: view.hours,
            location: view.location,
            guests: view.guests,
            special_requests: view.special_requests,
            hourly_rate: MoneyCents::new(view.hourly_rate_minor),
            total: MoneyCents::new(view.total_minor),
            status: view.status,
            created_at: view.created_at,
            updated_at: view.updated_at,
        })
    }
}

impl From<&Booking> for BookingView {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.clone(),
            client_id: booking.client_id.clone(),
            chef_id: booking.chef_id.clone(),
            client_name: booking.client_name.clone(),
            chef_name: booking.chef_name.clone(),
            cuisine: booking.cuisine.clone(),
            booking_date: booking.date,
            start_time: booking.start_time,
            hours: booking.hours,
            location: booking.location.clone(),
            guests: booking.guests,
            special_requests: booking.special_requests.clone(),
            hourly_rate_minor: booking.hourly_rate.cents(),
            total_minor: booking.total.cents(),
            status: booking.status,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// A validated booking request, ready to be sent to the repository.
///
/// Built through [`NewBooking::builder`]; the total is computed once in
/// [`NewBookingBuilder::build`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBooking {
    pub chef_id: String,
    pub chef_name: Option<String>,
    pub cuisine: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub hours: u32,
    pub location: String,
    pub guests: u32,
    pub special_requests: Option<String>,
    pub hourly_rate: MoneyCents,
    pub total: MoneyCents,
}

impl NewBooking {
    /// Return a builder for `NewBooking`.
    pub fn builder() -> NewBookingBuilder {
        NewBookingBuilder::default()
    }

    /// Check the required fields and that `total` is `hourly_rate * hours`.
    pub fn validate(&self) -> ResultEngine<()> {
        require_text(&self.chef_id, "chef id")?;
        require_text(&self.location, "location")?;
        if self.guests < 1 {
            return Err(EngineError::InvalidInput("guests must be >= 1".to_string()));
        }
        if compute_total(self.hourly_rate, self.hours)? != self.total {
            return Err(EngineError::InvalidInput(format!(
                "total {} does not match {} x {}h",
                self.total, self.hourly_rate, self.hours
            )));
        }
        Ok(())
    }
}

impl From<&NewBooking> for BookingNew {
    fn from(draft: &NewBooking) -> Self {
        Self {
            chef_id: draft.chef_id.clone(),
            chef_name: draft.chef_name.clone(),
            cuisine: draft.cuisine.clone(),
            booking_date: draft.date,
            start_time: draft.start_time,
            hours: draft.hours,
            location: draft.location.clone(),
            guests: draft.guests,
            special_requests: draft.special_requests.clone(),
            hourly_rate_minor: draft.hourly_rate.cents(),
            total_minor: draft.total.cents(),
        }
    }
}

/// The builder for `NewBooking`.
#[derive(Debug, Default)]
pub struct NewBookingBuilder {
    chef_id: String,
    chef_name: Option<String>,
    cuisine: Option<String>,
    date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    hours: u32,
    location: String,
    guests: u32,
    special_requests: Option<String>,
    hourly_rate: MoneyCents,
}

impl NewBookingBuilder {
    pub fn chef(mut self, chef_id: &str) -> NewBookingBuilder {
        self.chef_id = chef_id.to_string();
        self
    }

    /// Display fields copied from the chef's profile.
    pub fn chef_profile(mut self, name: Option<&str>, cuisine: Option<&str>) -> NewBookingBuilder {
        self.chef_name = normalize_optional_text(name);
        self.cuisine = normalize_optional_text(cuisine);
        self
    }

    pub fn schedule(
        mut self,
        date: NaiveDate,
        start_time: NaiveTime,
        hours: u32,
    ) -> NewBookingBuilder {
        self.date = Some(date);
        self.start_time = Some(start_time);
        self.hours = hours;
        self
    }

    pub fn location(mut self, location: &str) -> NewBookingBuilder {
        self.location = location.to_string();
        self
    }

    pub fn guests(mut self, guests: u32) -> NewBookingBuilder {
        self.guests = guests;
        self
    }

    pub fn special_requests(mut self, requests: Option<&str>) -> NewBookingBuilder {
        self.special_requests = normalize_optional_text(requests);
        self
    }

    pub fn hourly_rate(mut self, rate: MoneyCents) -> NewBookingBuilder {
        self.hourly_rate = rate;
        self
    }

    /// Validate the draft and fix its total.
    pub fn build(self) -> ResultEngine<NewBooking> {
        let date = self
            .date
            .ok_or_else(|| EngineError::InvalidInput("date is required".to_string()))?;
        let start_time = self
            .start_time
            .ok_or_else(|| EngineError::InvalidInput("start time is required".to_string()))?;
        let total = compute_total(self.hourly_rate, self.hours)?;

        let draft = NewBooking {
            chef_id: self.chef_id.trim().to_string(),
            chef_name: self.chef_name,
            cuisine: self.cuisine,
            date,
            start_time,
            hours: self.hours,
            location: self.location.trim().to_string(),
            guests: self.guests,
            special_requests: self.special_requests,
            hourly_rate: self.hourly_rate,
            total,
        };
        draft.validate()?;
        Ok(draft)
    }
}

fn require_text(value: &str, label: &str) -> ResultEngine<()> {
    if value.trim().is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
