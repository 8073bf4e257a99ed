//! Reservation (booked appointment) model and related types

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{hhmm, parse_date, parse_time};
use crate::error::{AppError, AppResult};

/// Reservation lifecycle status, stored as SMALLINT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending = 0,
    Confirmed = 1,
    Completed = 2,
    Cancelled = 3,
    NoShow = 4,
}

impl ReservationStatus {
    /// Whether a reservation with this status holds its time range
    pub fn occupies_slot(self) -> bool {
        self != ReservationStatus::Cancelled
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::NoShow => "no_show",
        };
        write!(f, "{}", label)
    }
}

/// Reservation record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    /// Name of the booked style
    pub style_name: String,
    /// Appointment date
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "10:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "12:30")]
    pub end_time: NaiveTime,
    pub status: ReservationStatus,
    /// Processor reference recorded by the payment webhook
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Time range already taken on a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookedSlot {
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "10:00")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "11:00")]
    pub end_time: NaiveTime,
    pub status: ReservationStatus,
}

impl BookedSlot {
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start_time < end && start < self.end_time
    }
}

impl From<&Reservation> for BookedSlot {
    fn from(r: &Reservation) -> Self {
        Self {
            start_time: r.start_time,
            end_time: r.end_time,
            status: r.status,
        }
    }
}

/// Create reservation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReservation {
    #[validate(length(min = 1, max = 120, message = "customer_name is required"))]
    pub customer_name: String,
    #[validate(email(message = "customer_email must be a valid email address"))]
    pub customer_email: String,
    #[validate(length(max = 40))]
    pub customer_phone: Option<String>,
    #[validate(length(min = 1, max = 120, message = "style_name is required"))]
    pub style_name: String,
    /// Appointment date (YYYY-MM-DD)
    pub date: String,
    /// Start time (HH:MM)
    pub start_time: String,
    /// End time (HH:MM)
    pub end_time: String,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Validated reservation ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub style_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<String>,
}

impl CreateReservation {
    pub fn into_new(self) -> AppResult<NewReservation> {
        self.validate()?;

        let customer_name = self.customer_name.trim();
        if customer_name.is_empty() {
            return Err(AppError::Validation("customer_name is required".to_string()));
        }
        let style_name = self.style_name.trim();
        if style_name.is_empty() {
            return Err(AppError::Validation("style_name is required".to_string()));
        }

        let date = parse_date(&self.date, "date")?;
        let start_time = parse_time(&self.start_time, "start_time")?;
        let end_time = parse_time(&self.end_time, "end_time")?;
        if start_time >= end_time {
            return Err(AppError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }

        Ok(NewReservation {
            customer_name: customer_name.to_string(),
            customer_email: self.customer_email.trim().to_string(),
            customer_phone: self.customer_phone.filter(|p| !p.trim().is_empty()),
            style_name: style_name.to_string(),
            date,
            start_time,
            end_time,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Query parameters for listing reservations
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ReservationQuery {
    /// Reservations on or after this date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Reservations on or before this date (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// Filter by status
    pub status: Option<ReservationStatus>,
}

/// Parsed reservation filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
}

impl ReservationQuery {
    pub fn into_filter(self) -> AppResult<ReservationFilter> {
        Ok(ReservationFilter {
            start_date: self
                .start_date
                .as_deref()
                .map(|s| parse_date(s, "start_date"))
                .transpose()?,
            end_date: self
                .end_date
                .as_deref()
                .map(|s| parse_date(s, "end_date"))
                .transpose()?,
            status: self.status,
        })
    }
}

/// Staff status update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReservationStatus {
    pub status: ReservationStatus,
}

/// Outcome reported by the payment processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
    #[serde(other)]
    Other,
}

/// Payment webhook payload
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaymentEvent {
    pub reservation_id: i32,
    /// "succeeded", "failed" or any other processor state
    #[schema(value_type = String, example = "succeeded")]
    pub outcome: PaymentOutcome,
    pub payment_reference: Option<String>,
}

impl PaymentEvent {
    /// Status a pending reservation moves to, if any
    pub fn target_status(&self) -> Option<ReservationStatus> {
        match self.outcome {
            PaymentOutcome::Succeeded => Some(ReservationStatus::Confirmed),
            PaymentOutcome::Failed => Some(ReservationStatus::Cancelled),
            PaymentOutcome::Other => None,
        }
    }
}
