use chefbook_client::{BookingRepository, BookingStore};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Subcommand};
use engine::{Action, Booking, BookingStatus, MoneyCents, NewBooking, Role};

use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the bookings of the signed-in user.
    List {
        /// Only show bookings with this status.
        #[arg(long)]
        status: Option<BookingStatus>,
    },
    /// Count bookings per status.
    Summary,
    /// Sum of confirmed bookings.
    Earnings,
    /// Request a booking with a chef.
    Book(BookArgs),
    /// Accept a pending request (chef).
    Accept { id: String },
    /// Decline a pending request (chef).
    Decline { id: String },
    /// Cancel a pending request (client).
    Cancel { id: String },
}

#[derive(Args, Debug)]
pub struct BookArgs {
    #[arg(long)]
    chef: String,
    #[arg(long)]
    chef_name: Option<String>,
    #[arg(long)]
    cuisine: Option<String>,
    /// Date of the event (YYYY-MM-DD).
    #[arg(long)]
    date: NaiveDate,
    /// Start time (HH:MM).
    #[arg(long, value_parser = parse_start)]
    start: NaiveTime,
    #[arg(long)]
    hours: u32,
    /// Hourly rate of the chef (e.g. 100 or 99.50).
    #[arg(long)]
    rate: MoneyCents,
    #[arg(long)]
    location: String,
    #[arg(long)]
    guests: u32,
    #[arg(long)]
    requests: Option<String>,
}

fn parse_start(raw: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("invalid start time {raw:?}, expected HH:MM"))
}

/// Load the session bookings, run `command` and return what to print.
pub async fn execute<R: BookingRepository>(
    store: &BookingStore<R>,
    command: Command,
    currency: &str,
) -> Result<String> {
    store.load().await?;
    let role = store.actor().role;

    let output = match command {
        Command::List { status } => {
            let bookings = store.filter_by_status(status);
            if bookings.is_empty() {
                "No bookings.".to_string()
            } else {
                bookings
                    .iter()
                    .map(|booking| render_booking(booking, role, currency))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::Summary => {
            let summary = store.summary();
            format!(
                "pending:   {}\n\
                 confirmed: {}\n\
                 declined:  {}\n\
                 cancelled: {}\n\
                 earnings:  {currency} {}",
                summary.pending,
                summary.confirmed,
                summary.declined,
                summary.cancelled,
                summary.earnings
            )
        }
        Command::Earnings => format!("{currency} {}", store.total_earnings()),
        Command::Book(args) => {
            let draft = NewBooking::builder()
                .chef(&args.chef)
                .chef_profile(args.chef_name.as_deref(), args.cuisine.as_deref())
                .schedule(args.date, args.start, args.hours)
                .hourly_rate(args.rate)
                .location(&args.location)
                .guests(args.guests)
                .special_requests(args.requests.as_deref())
                .build()?;
            let booking = store.create(draft).await?;
            format!(
                "Requested booking {} with chef {} for {currency} {}",
                booking.id,
                booking.chef_name.as_deref().unwrap_or(&booking.chef_id),
                booking.total
            )
        }
        Command::Accept { id } => transition(store, &id, Action::Accept).await?,
        Command::Decline { id } => transition(store, &id, Action::Decline).await?,
        Command::Cancel { id } => transition(store, &id, Action::Cancel).await?,
    };
    Ok(output)
}

async fn transition<R: BookingRepository>(
    store: &BookingStore<R>,
    id: &str,
    action: Action,
) -> Result<String> {
    let booking = store.request_transition(id, action).await?;
    Ok(format!("Booking {} is now {}", booking.id, booking.status))
}

/// One line per booking; the counterpart is the other side of the booking.
fn render_booking(booking: &Booking, role: Role, currency: &str) -> String {
    let counterpart = match role {
        Role::Client => booking.chef_name.as_deref().unwrap_or(&booking.chef_id),
        Role::Chef => booking.client_name.as_deref().unwrap_or(&booking.client_id),
    };
    format!(
        "{}  {} {}  {}h  {:<9}  {currency} {}  {counterpart}",
        booking.id,
        booking.date,
        booking.start_time.format("%H:%M"),
        booking.hours,
        booking.status.as_str(),
        booking.total,
    )
}
