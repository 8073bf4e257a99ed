//! Data models for the salon booking server

pub mod availability;
pub mod claims;
pub mod reservation;
pub mod schedule;

// Re-export commonly used types
pub use availability::SlotAnswer;
pub use claims::StaffClaims;
pub use reservation::{BookedSlot, Reservation, ReservationStatus};
pub use schedule::{Blackout, WeeklyHours, WeeklySlot};

use chrono::{DateTime, NaiveDate, NaiveTime};

use crate::error::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, in which case the
/// time-of-day is dropped.
pub fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::Validation(format!("Invalid {} (use YYYY-MM-DD)", field)))
}

/// Parse a wall-clock time in `HH:MM` form
pub fn parse_time(value: &str, field: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| AppError::Validation(format!("Invalid {} (use HH:MM)", field)))
}

/// Serde adapter rendering `NaiveTime` as `HH:MM`
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
