//! Booking creation and reservation status management

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{
        reservation::{CreateReservation, PaymentEvent, ReservationQuery},
        Reservation, ReservationStatus,
    },
    repository::Repository,
};

use super::{availability::AvailabilityService, email::EmailService};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
    availability: AvailabilityService,
    email: EmailService,
}

impl ReservationsService {
    pub fn new(
        repository: Repository,
        availability: AvailabilityService,
        email: EmailService,
    ) -> Self {
        Self {
            repository,
            availability,
            email,
        }
    }

    /// Create a pending reservation.
    ///
    /// The date must be today or later and resolve open, and the range must
    /// sit within opening hours. Overlap with existing bookings is allowed.
    pub async fn create(&self, data: CreateReservation, today: NaiveDate) -> AppResult<Reservation> {
        let new = data.into_new()?;
        if new.date < today {
            return Err(AppError::Validation("date is in the past".to_string()));
        }

        let answer = self.availability.resolve(new.date).await?;
        if answer.is_blocked {
            let reason = answer.block_reason.as_deref().unwrap_or("closed");
            return Err(AppError::BusinessRule(format!(
                "The salon is closed on {} ({})",
                new.date, reason
            )));
        }
        if !answer.is_open {
            return Err(AppError::BusinessRule(format!(
                "The salon is closed on {}",
                new.date
            )));
        }
        if new.start_time < answer.open_time || new.end_time > answer.close_time {
            return Err(AppError::BusinessRule(format!(
                "Appointments on {} must fall between {} and {}",
                new.date,
                answer.open_time.format("%H:%M"),
                answer.close_time.format("%H:%M"),
            )));
        }

        let overlapping = answer
            .booked_slots
            .iter()
            .filter(|s| s.overlaps(new.start_time, new.end_time))
            .count();
        if overlapping > 0 {
            tracing::warn!(
                date = %new.date,
                start = %new.start_time,
                overlapping,
                "Reservation overlaps existing bookings"
            );
        }

        let reservation = self.repository.reservations.create(&new).await?;
        tracing::info!(
            id = reservation.id,
            date = %reservation.date,
            "Reservation created"
        );
        Ok(reservation)
    }

    pub async fn list(&self, query: ReservationQuery) -> AppResult<Vec<Reservation>> {
        let filter = query.into_filter()?;
        self.repository.reservations.list(&filter).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        self.repository.reservations.get_by_id(id).await
    }

    /// Staff status change; any transition is accepted
    pub async fn update_status(&self, id: i32, status: ReservationStatus) -> AppResult<Reservation> {
        let current = self.repository.reservations.get_by_id(id).await?;
        let updated = self
            .repository
            .reservations
            .update_status(id, status, None)
            .await?;

        tracing::info!(id, from = %current.status, to = %status, "Reservation status changed");
        if status == ReservationStatus::Confirmed && current.status != ReservationStatus::Confirmed {
            self.notify_confirmed(&updated).await;
        }
        Ok(updated)
    }

    /// Apply a payment processor notification.
    ///
    /// Only pending reservations move; anything else is returned unchanged
    /// so redelivered events are harmless.
    pub async fn apply_payment_event(&self, event: PaymentEvent) -> AppResult<Reservation> {
        let current = self.repository.reservations.get_by_id(event.reservation_id).await?;

        let Some(target) = event.target_status() else {
            tracing::debug!(id = current.id, "Ignoring payment event without outcome");
            return Ok(current);
        };

        if current.status != ReservationStatus::Pending {
            tracing::info!(
                id = current.id,
                status = %current.status,
                "Payment event for non-pending reservation ignored"
            );
            return Ok(current);
        }

        let updated = self
            .repository
            .reservations
            .update_status(current.id, target, event.payment_reference)
            .await?;
        tracing::info!(id = updated.id, to = %target, "Reservation updated from payment");

        if target == ReservationStatus::Confirmed {
            self.notify_confirmed(&updated).await;
        }
        Ok(updated)
    }

    async fn notify_confirmed(&self, reservation: &Reservation) {
        if !self.email.is_enabled() {
            return;
        }
        if let Err(e) = self.email.send_booking_confirmation(reservation).await {
            tracing::warn!(
                id = reservation.id,
                error = %e,
                "Failed to send confirmation email"
            );
        }
    }
}
