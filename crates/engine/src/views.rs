//! Read models derived from a booking collection.

use serde::{Deserialize, Serialize};

use crate::{Booking, BookingStatus, MoneyCents};

/// Bookings with the given status, in their original order. `None` keeps all.
pub fn filter_by_status(bookings: &[Booking], status: Option<BookingStatus>) -> Vec<Booking> {
    bookings
        .iter()
        .filter(|booking| status.is_none_or(|status| booking.status == status))
        .cloned()
        .collect()
}

/// Sum of the totals of confirmed bookings.
pub fn total_earnings(bookings: &[Booking]) -> MoneyCents {
    bookings
        .iter()
        .filter(|booking| booking.status == BookingStatus::Confirmed)
        .map(|booking| booking.total)
        .sum()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    pub pending: usize,
    pub confirmed: usize,
    pub declined: usize,
    pub cancelled: usize,
    pub earnings: MoneyCents,
}

impl BookingSummary {
    pub fn count(&self, status: BookingStatus) -> usize {
        match status {
            BookingStatus::Pending => self.pending,
            BookingStatus::Confirmed => self.confirmed,
            BookingStatus::Declined => self.declined,
            BookingStatus::Cancelled => self.cancelled,
        }
    }
}

pub fn summarize(bookings: &[Booking]) -> BookingSummary {
    let mut summary = BookingSummary {
        earnings: total_earnings(bookings),
        ..BookingSummary::default()
    };
    for booking in bookings {
        match booking.status {
            BookingStatus::Pending => summary.pending += 1,
            BookingStatus::Confirmed => summary.confirmed += 1,
            BookingStatus::Declined => summary.declined += 1,
            BookingStatus::Cancelled => summary.cancelled += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, Utc};

    use super::*;

    fn booking(id: &str, status: BookingStatus, total: i64) -> Booking {
        let now = Utc::now();
        Booking {
            id: id.to_string(),
            client_id: "1".to_string(),
            chef_id: "2".to_string(),
            client_name: None,
            chef_name: None,
            cuisine: None,
            date: NaiveDate::from_ymd_opt(2025, 12, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            hours: 3,
            location: "Nairobi".to_string(),
            guests: 2,
            special_requests: None,
            hourly_rate: MoneyCents::new(total / 3),
            total: MoneyCents::new(total),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn ids(bookings: &[Booking]) -> Vec<&str> {
        bookings.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn filter_keeps_relative_order() {
        let bookings = vec![
            booking("a", BookingStatus::Confirmed, 300),
            booking("b", BookingStatus::Pending, 300),
            booking("c", BookingStatus::Confirmed, 300),
            booking("d", BookingStatus::Declined, 300),
        ];

        let accepted: BookingStatus = "accepted".parse().unwrap();
        assert_eq!(ids(&filter_by_status(&bookings, Some(accepted))), ["a", "c"]);
        assert_eq!(ids(&filter_by_status(&bookings, None)), ["a", "b", "c", "d"]);
        assert!(filter_by_status(&bookings, Some(BookingStatus::Cancelled)).is_empty());
    }

    #[test]
    fn earnings_count_confirmed_only() {
        let bookings = vec![
            booking("a", BookingStatus::Confirmed, 300),
            booking("b", BookingStatus::Pending, 300),
            booking("c", BookingStatus::Confirmed, 300),
            booking("d", BookingStatus::Declined, 900),
            booking("e", BookingStatus::Cancelled, 900),
        ];
        assert_eq!(total_earnings(&bookings), MoneyCents::new(600));
        assert_eq!(total_earnings(&[]), MoneyCents::ZERO);
    }

    #[test]
    fn summary_counts_each_status() {
        let bookings = vec![
            booking("a", BookingStatus::Confirmed, 300),
            booking("b", BookingStatus::Pending, 300),
            booking("c", BookingStatus::Pending, 300),
            booking("d", BookingStatus::Cancelled, 300),
        ];
        let summary = summarize(&bookings);
        assert_eq!(summary.count(BookingStatus::Pending), 2);
        assert_eq!(summary.confirmed, 1);
        assert_eq!(summary.declined, 0);
        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.earnings, MoneyCents::new(300));
        assert_eq!(summarize(&[]), BookingSummary::default());
    }
}
