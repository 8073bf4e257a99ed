//! Availability models (weekly template, blackout dates)

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{hhmm, parse_date, parse_time};
use crate::error::{AppError, AppResult};

/// Day-of-week index of Sunday (0=Sunday, 6=Saturday)
pub const SUNDAY: i16 = 0;

/// Number of entries in a weekly template
pub const DAYS_PER_WEEK: i16 = 7;

/// Opening time used when no row is stored for a day
pub fn default_open_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

/// Closing time used when no row is stored for a day
pub fn default_close_time() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// WeeklySlot
// ---------------------------------------------------------------------------

/// Stored weekly opening hours for one day of the week
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WeeklySlot {
    pub id: i32,
    /// Provider the row applies to (NULL = whole business)
    pub provider_scope: Option<String>,
    /// Day of week (0=Sunday, 6=Saturday)
    pub day_of_week: i16,
    pub is_available: bool,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "18:00")]
    pub end_time: NaiveTime,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Effective opening hours for one weekday, stored or defaulted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WeeklyHours {
    /// Day of week (0=Sunday, 6=Saturday)
    pub day_of_week: i16,
    pub is_available: bool,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "18:00")]
    pub end_time: NaiveTime,
}

impl WeeklyHours {
    /// Fallback policy: open 09:00-18:00, closed on Sunday.
    ///
    /// Computed at read time only, never written back to the store.
    pub fn default_for(day_of_week: i16) -> Self {
        Self {
            day_of_week,
            is_available: day_of_week != SUNDAY,
            start_time: default_open_time(),
            end_time: default_close_time(),
        }
    }

    /// Stored row when present, default policy otherwise
    pub fn resolve(day_of_week: i16, stored: Option<&WeeklySlot>) -> Self {
        stored
            .map(WeeklyHours::from)
            .unwrap_or_else(|| Self::default_for(day_of_week))
    }
}

impl From<&WeeklySlot> for WeeklyHours {
    fn from(slot: &WeeklySlot) -> Self {
        Self {
            day_of_week: slot.day_of_week,
            is_available: slot.is_available,
            start_time: slot.start_time,
            end_time: slot.end_time,
        }
    }
}

/// Build the full seven-day template from whatever rows are stored
pub fn weekly_template(rows: &[WeeklySlot]) -> Vec<WeeklyHours> {
    (0..DAYS_PER_WEEK)
        .map(|day| WeeklyHours::resolve(day, rows.iter().find(|r| r.day_of_week == day)))
        .collect()
}

/// One day of a save-template request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct WeeklyTemplateEntry {
    /// Day of week (0=Sunday, 6=Saturday)
    #[validate(range(min = 0, max = 6, message = "day_of_week must be between 0 and 6"))]
    pub day_of_week: i16,
    pub is_open: bool,
    /// Opening time (HH:MM), defaults to 09:00
    pub start: Option<String>,
    /// Closing time (HH:MM), defaults to 18:00
    pub end: Option<String>,
}

/// Save weekly template request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveWeeklyTemplate {
    pub days: Option<Vec<WeeklyTemplateEntry>>,
}

impl SaveWeeklyTemplate {
    /// Validate every entry and convert to typed hours.
    ///
    /// Rejects a missing list, out-of-range days, unparsable times and
    /// duplicate days. Days absent from the list are left untouched.
    pub fn into_hours(self) -> AppResult<Vec<WeeklyHours>> {
        let days = self
            .days
            .ok_or_else(|| AppError::Validation("days is required".to_string()))?;

        let mut seen = HashSet::new();
        let mut hours = Vec::with_capacity(days.len());

        for entry in days {
            entry.validate()?;
            if !seen.insert(entry.day_of_week) {
                return Err(AppError::Validation(format!(
                    "day_of_week {} appears more than once",
                    entry.day_of_week
                )));
            }

            let start_time = match entry.start.as_deref() {
                Some(s) => parse_time(s, "start")?,
                None => default_open_time(),
            };
            let end_time = match entry.end.as_deref() {
                Some(s) => parse_time(s, "end")?,
                None => default_close_time(),
            };

            hours.push(WeeklyHours {
                day_of_week: entry.day_of_week,
                is_available: entry.is_open,
                start_time,
                end_time,
            });
        }

        Ok(hours)
    }
}

// ---------------------------------------------------------------------------
// Blackout
// ---------------------------------------------------------------------------

/// A calendar date forced closed
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Blackout {
    pub id: i32,
    /// Closed date
    pub date: NaiveDate,
    /// Reason for closure
    pub reason: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
}

/// Create blackout request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBlackout {
    /// Closed date (YYYY-MM-DD)
    pub date: Option<String>,
    pub reason: Option<String>,
}

/// Validated blackout ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlackout {
    pub date: NaiveDate,
    pub reason: Option<String>,
}

impl CreateBlackout {
    pub fn into_new(self) -> AppResult<NewBlackout> {
        let raw = self
            .date
            .ok_or_else(|| AppError::Validation("date is required".to_string()))?;
        let date = parse_date(&raw, "date")?;
        let reason = self
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Ok(NewBlackout { date, reason })
    }
}

/// Identifier of a newly created blackout
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlackoutCreated {
    pub id: i32,
}
