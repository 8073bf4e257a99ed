//! Slot resolution: weekly template + blackouts + reservations for one date

use chrono::{Datelike, NaiveDate};

use crate::{
    error::{AppError, AppResult},
    models::{parse_date, SlotAnswer, WeeklyHours},
    repository::Repository,
};

/// Day-of-week index with 0 = Sunday
pub fn day_of_week(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
}

impl AvailabilityService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Parse a raw date and resolve it
    pub async fn resolve_raw(&self, raw: Option<&str>) -> AppResult<SlotAnswer> {
        let raw = raw
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::Validation("date is required".to_string()))?;
        let date = parse_date(raw, "date")?;
        self.resolve(date).await
    }

    /// Answer whether `date` is open, its hours, and which ranges are taken.
    ///
    /// A blackout overrides the weekly template. Booked slots are reported
    /// as-is and never subtracted from the opening hours.
    pub async fn resolve(&self, date: NaiveDate) -> AppResult<SlotAnswer> {
        let weekday = day_of_week(date);

        let (stored, blackout, booked_slots) = tokio::try_join!(
            self.repository.schedules.get_weekly(weekday),
            self.repository.blackouts.find_on(date),
            self.repository.reservations.booked_on(date),
        )?;

        let hours = WeeklyHours::resolve(weekday, stored.as_ref());
        let is_blocked = blackout.is_some();

        tracing::debug!(
            %date,
            weekday,
            is_blocked,
            booked = booked_slots.len(),
            "Resolved slots"
        );

        Ok(SlotAnswer {
            date,
            is_open: hours.is_available && !is_blocked,
            open_time: hours.start_time,
            close_time: hours.end_time,
            is_blocked,
            block_reason: blackout.and_then(|b| b.reason),
            booked_slots,
        })
    }
}
