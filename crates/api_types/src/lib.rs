use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body returned by the booking API on non-2xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod booking {
    use std::{fmt, str::FromStr};

    use super::*;

    /// Status of a booking request.
    ///
    /// `pending` is the only non-terminal status. Older API versions call a
    /// confirmed booking `accepted`, so that label is read as `confirmed`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum BookingStatus {
        Pending,
        #[serde(alias = "accepted")]
        Confirmed,
        Declined,
        Cancelled,
    }

    impl BookingStatus {
        pub const ALL: [BookingStatus; 4] = [
            Self::Pending,
            Self::Confirmed,
            Self::Declined,
            Self::Cancelled,
        ];

        /// Returns the canonical status string used on the wire.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Pending => "pending",
                Self::Confirmed => "confirmed",
                Self::Declined => "declined",
                Self::Cancelled => "cancelled",
            }
        }
    }

    impl fmt::Display for BookingStatus {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl FromStr for BookingStatus {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "pending" => Ok(Self::Pending),
                "confirmed" | "accepted" => Ok(Self::Confirmed),
                "declined" => Ok(Self::Declined),
                "cancelled" | "canceled" => Ok(Self::Cancelled),
                other => Err(format!("invalid booking status: {other}")),
            }
        }
    }

    /// Which side of the marketplace a user acts on.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Role {
        Client,
        Chef,
    }

    impl Role {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Client => "client",
                Self::Chef => "chef",
            }
        }
    }

    impl fmt::Display for Role {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl FromStr for Role {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "client" => Ok(Self::Client),
                "chef" => Ok(Self::Chef),
                other => Err(format!("invalid role: {other}")),
            }
        }
    }

    /// A booking as returned by the API.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BookingView {
        pub id: String,
        pub client_id: String,
        pub chef_id: String,
        #[serde(default)]
        pub client_name: Option<String>,
        #[serde(default)]
        pub chef_name: Option<String>,
        #[serde(default)]
        pub cuisine: Option<String>,
        pub booking_date: NaiveDate,
        #[serde(with = "hour_minute")]
        pub start_time: NaiveTime,
        pub hours: u32,
        pub location: String,
        pub guests: u32,
        #[serde(default)]
        pub special_requests: Option<String>,
        /// Hourly rate agreed when the booking was created.
        pub hourly_rate_minor: i64,
        /// `hourly_rate_minor * hours`, fixed at creation.
        pub total_minor: i64,
        pub status: BookingStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Request body for `POST /bookings`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BookingNew {
        pub chef_id: String,
        pub chef_name: Option<String>,
        pub cuisine: Option<String>,
        pub booking_date: NaiveDate,
        #[serde(with = "hour_minute")]
        pub start_time: NaiveTime,
        pub hours: u32,
        pub location: String,
        pub guests: u32,
        pub special_requests: Option<String>,
        pub hourly_rate_minor: i64,
        pub total_minor: i64,
    }

    /// Request body for `PATCH /bookings/{id}/status`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BookingStatusUpdate {
        pub status: BookingStatus,
    }

    /// Response body for the booking list endpoints.
    ///
    /// Some deployments return a bare array, others wrap it in an object.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum BookingListResponse {
        Bare(Vec<BookingView>),
        Wrapped { bookings: Vec<BookingView> },
    }

    impl BookingListResponse {
        pub fn into_bookings(self) -> Vec<BookingView> {
            match self {
                Self::Bare(bookings) | Self::Wrapped { bookings } => bookings,
            }
        }
    }

    /// `HH:MM` on output, `HH:MM` or `HH:MM:SS` on input.
    mod hour_minute {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        pub fn serialize<S: Serializer>(
            time: &NaiveTime,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&time.format("%H:%M").to_string())
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<NaiveTime, D::Error> {
            let raw = String::deserialize(deserializer)?;
            NaiveTime::parse_from_str(&raw, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
                .map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::booking::*;

    #[test]
    fn accepted_is_read_as_confirmed() {
        let status: BookingStatus = serde_json::from_str("\"accepted\"").unwrap();
        assert_eq!(status, BookingStatus::Confirmed);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"confirmed\"");
        assert_eq!("Accepted".parse::<BookingStatus>().unwrap(), BookingStatus::Confirmed);
        assert!("archived".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn list_response_accepts_bare_and_wrapped() {
        let bare: BookingListResponse = serde_json::from_str("[]").unwrap();
        assert!(bare.into_bookings().is_empty());

        let wrapped: BookingListResponse = serde_json::from_str(r#"{"bookings": []}"#).unwrap();
        assert!(wrapped.into_bookings().is_empty());
    }

    #[test]
    fn start_time_uses_hour_minute() {
        let body = r#"{
            "id": "1",
            "client_id": "7",
            "chef_id": "2",
            "client_name": "John Client",
            "booking_date": "2025-12-10",
            "start_time": "14:00:00",
            "hours": 3,
            "location": "Nairobi",
            "guests": 4,
            "hourly_rate_minor": 10000,
            "total_minor": 30000,
            "status": "pending",
            "created_at": "2025-12-01T10:00:00Z",
            "updated_at": "2025-12-01T10:00:00Z"
        }"#;
        let view: BookingView = serde_json::from_str(body).unwrap();
        assert_eq!(view.start_time.format("%H:%M").to_string(), "14:00");
        assert_eq!(view.chef_name, None);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["start_time"], "14:00");
    }
}
