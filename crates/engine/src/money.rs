use std::{fmt, iter::Sum, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// A price in integer minor units (cents). Rates and totals use this type.
///
/// ```rust
/// use engine::MoneyCents;
///
/// let rate = MoneyCents::new(100_00);
/// assert_eq!(rate.to_string(), "100.00");
/// assert_eq!(rate.checked_mul(3), Some(MoneyCents::new(300_00)));
/// ```
///
/// Prices typed by a user parse with `.` or `,` and at most two decimals:
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("99,5".parse::<MoneyCents>().unwrap().cents(), 9950);
/// assert!("-10".parse::<MoneyCents>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `self * hours`, `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, hours: u32) -> Option<MoneyCents> {
        self.0.checked_mul(i64::from(hours)).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Saturates on overflow.
impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        MoneyCents(iter.fold(0i64, |acc, amount| acc.saturating_add(amount.0)))
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidInput(format!("invalid price: {s:?}"));

        let normalized = s.trim().replace(',', ".");
        let (units, fraction) = normalized
            .split_once('.')
            .unwrap_or((normalized.as_str(), ""));
        let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if units.is_empty() || !digits_only(units) || !digits_only(fraction) {
            return Err(invalid());
        }

        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            2 => fraction.parse::<i64>().map_err(|_| invalid())?,
            _ => {
                return Err(EngineError::InvalidInput(format!(
                    "price {s:?} has more than two decimals"
                )));
            }
        };

        units
            .parse::<i64>()
            .ok()
            .and_then(|units| units.checked_mul(100))
            .and_then(|cents| cents.checked_add(fraction_cents))
            .map(MoneyCents)
            .ok_or_else(|| EngineError::InvalidInput(format!("price {s:?} is too large")))
    }
}
