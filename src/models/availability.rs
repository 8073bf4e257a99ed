//! Slot answer returned for a single calendar date

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{hhmm, reservation::BookedSlot};

/// Availability of one date: opening hours, closure and taken ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SlotAnswer {
    pub date: NaiveDate,
    /// False when the weekday is closed or the date is blacked out
    pub is_open: bool,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:00")]
    pub open_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "18:00")]
    pub close_time: NaiveTime,
    /// True when a blackout exists for the date
    pub is_blocked: bool,
    pub block_reason: Option<String>,
    /// Non-cancelled reservations on the date (informational)
    pub booked_slots: Vec<BookedSlot>,
}

/// Query parameters for the slot lookup
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SlotQuery {
    /// Date to resolve (YYYY-MM-DD or RFC 3339 timestamp)
    pub date: Option<String>,
}
