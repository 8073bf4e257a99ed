//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{availability, health, reservations, schedules};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salon Booking API",
        version = "0.3.0",
        description = "Availability, blackout and booking REST API for a braiding salon",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Availability
        availability::get_slots,
        schedules::get_weekly_template,
        schedules::save_weekly_template,
        schedules::list_blackouts,
        schedules::create_blackout,
        schedules::delete_blackout,
        // Bookings
        reservations::create_booking,
        reservations::list_bookings,
        reservations::get_booking,
        reservations::update_booking_status,
        reservations::payment_webhook,
    ),
    components(
        schemas(
            // Availability
            crate::models::availability::SlotAnswer,
            crate::models::availability::SlotQuery,
            crate::models::schedule::WeeklySlot,
            crate::models::schedule::WeeklyHours,
            crate::models::schedule::WeeklyTemplateEntry,
            crate::models::schedule::SaveWeeklyTemplate,
            crate::models::schedule::Blackout,
            crate::models::schedule::CreateBlackout,
            crate::models::schedule::BlackoutCreated,
            // Bookings
            crate::models::reservation::Reservation,
            crate::models::reservation::ReservationStatus,
            crate::models::reservation::BookedSlot,
            crate::models::reservation::CreateReservation,
            crate::models::reservation::ReservationQuery,
            crate::models::reservation::UpdateReservationStatus,
            crate::models::reservation::PaymentEvent,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "availability", description = "Opening hours, blackouts and slot lookup"),
        (name = "bookings", description = "Reservations and payment notifications")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
