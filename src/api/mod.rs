//! API handlers for the salon REST endpoints

pub mod availability;
pub mod health;
pub mod openapi;
pub mod reservations;
pub mod schedules;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::StaffClaims, AppState};

/// Extractor for a dashboard user holding the admin role
pub struct AdminUser(pub StaffClaims);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = StaffClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;
        claims.require_admin()?;

        Ok(AdminUser(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Public booking surface
        .route("/availability/slots", get(availability::get_slots))
        .route("/bookings", post(reservations::create_booking))
        .route("/webhooks/payment", post(reservations::payment_webhook))
        // Admin: availability editor
        .route(
            "/admin/availability/weekly",
            get(schedules::get_weekly_template).put(schedules::save_weekly_template),
        )
        .route(
            "/admin/availability/blackouts",
            get(schedules::list_blackouts).post(schedules::create_blackout),
        )
        .route("/admin/availability/blackouts/:id", delete(schedules::delete_blackout))
        // Admin: bookings
        .route("/admin/bookings", get(reservations::list_bookings))
        .route("/admin/bookings/:id", get(reservations::get_booking))
        .route("/admin/bookings/:id/status", put(reservations::update_booking_status))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
