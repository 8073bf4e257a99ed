//! Booking endpoints (public creation, admin management, payment webhook)

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::{
        reservation::{CreateReservation, PaymentEvent, ReservationQuery, UpdateReservationStatus},
        Reservation,
    },
    services::today,
};

use super::AdminUser;

/// Header carrying the shared secret on payment notifications
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Book an appointment
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation created (pending payment)", body = Reservation),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 422, description = "Date closed or outside opening hours", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): WithRejection<Json<CreateReservation>, AppError>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = state.services.reservations.create(data, today()).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// List reservations
#[utoipa::path(
    get,
    path = "/admin/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(ReservationQuery),
    responses(
        (status = 200, description = "Reservations", body = Vec<Reservation>)
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    WithRejection(Query(query), _): WithRejection<Query<ReservationQuery>, AppError>,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state.services.reservations.list(query).await?;
    Ok(Json(reservations))
}

/// Get a reservation by ID
#[utoipa::path(
    get,
    path = "/admin/bookings/{id}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation", body = Reservation),
        (status = 404, description = "Unknown reservation", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.reservations.get_by_id(id).await?;
    Ok(Json(reservation))
}

/// Change a reservation's status
#[utoipa::path(
    put,
    path = "/admin/bookings/{id}/status",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = UpdateReservationStatus,
    responses(
        (status = 200, description = "Reservation updated", body = Reservation),
        (status = 404, description = "Unknown reservation", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_booking_status(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(data), _): WithRejection<Json<UpdateReservationStatus>, AppError>,
) -> AppResult<Json<Reservation>> {
    tracing::info!(user = %claims.sub, id, status = %data.status, "Staff status change");
    let reservation = state
        .services
        .reservations
        .update_status(id, data.status)
        .await?;
    Ok(Json(reservation))
}

/// Payment processor notification
#[utoipa::path(
    post,
    path = "/webhooks/payment",
    tag = "bookings",
    request_body = PaymentEvent,
    params(("x-webhook-secret" = String, Header, description = "Shared webhook secret")),
    responses(
        (status = 200, description = "Reservation after the event", body = Reservation),
        (status = 401, description = "Bad or missing secret", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown reservation", body = crate::error::ErrorResponse)
    )
)]
pub async fn payment_webhook(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<Reservation>> {
    verify_webhook_secret(&headers, &state.config.payments.webhook_secret)?;
    let event: PaymentEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid payment event: {}", e)))?;
    let reservation = state.services.reservations.apply_payment_event(event).await?;
    Ok(Json(reservation))
}

fn verify_webhook_secret(headers: &HeaderMap, expected: &str) -> AppResult<()> {
    let provided = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing webhook secret".to_string()))?;

    if !constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        return Err(AppError::Authentication("Invalid webhook secret".to_string()));
    }
    Ok(())
}

/// Byte comparison whose duration depends only on the lengths
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
