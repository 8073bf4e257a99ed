//! Availability editor endpoints (weekly template, blackouts)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::{
        schedule::{BlackoutCreated, CreateBlackout, SaveWeeklyTemplate},
        Blackout, WeeklyHours,
    },
    services::today,
};

use super::AdminUser;

// ---- Weekly template ----

/// Weekly opening template (always seven days, Sunday first)
#[utoipa::path(
    get,
    path = "/admin/availability/weekly",
    tag = "availability",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Weekly template", body = Vec<WeeklyHours>)
    )
)]
pub async fn get_weekly_template(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
) -> AppResult<Json<Vec<WeeklyHours>>> {
    let template = state.services.schedules.list_weekly_template().await?;
    Ok(Json(template))
}

/// Save opening hours for the submitted days
#[utoipa::path(
    put,
    path = "/admin/availability/weekly",
    tag = "availability",
    security(("bearer_auth" = [])),
    request_body = SaveWeeklyTemplate,
    responses(
        (status = 200, description = "Template after the save", body = Vec<WeeklyHours>),
        (status = 400, description = "Invalid entries", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_weekly_template(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
    WithRejection(Json(data), _): WithRejection<Json<SaveWeeklyTemplate>, AppError>,
) -> AppResult<Json<Vec<WeeklyHours>>> {
    tracing::info!(user = %claims.sub, "Saving weekly template");
    state.services.schedules.save_weekly_template(data).await?;
    let template = state.services.schedules.list_weekly_template().await?;
    Ok(Json(template))
}

// ---- Blackouts ----

/// Blackout dates from today onwards
#[utoipa::path(
    get,
    path = "/admin/availability/blackouts",
    tag = "availability",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Upcoming blackouts", body = Vec<Blackout>)
    )
)]
pub async fn list_blackouts(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
) -> AppResult<Json<Vec<Blackout>>> {
    let blackouts = state.services.schedules.list_future_blackouts(today()).await?;
    Ok(Json(blackouts))
}

/// Add a blackout date
#[utoipa::path(
    post,
    path = "/admin/availability/blackouts",
    tag = "availability",
    security(("bearer_auth" = [])),
    request_body = CreateBlackout,
    responses(
        (status = 201, description = "Blackout created", body = BlackoutCreated),
        (status = 400, description = "Missing or invalid date", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_blackout(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    WithRejection(Json(data), _): WithRejection<Json<CreateBlackout>, AppError>,
) -> AppResult<(StatusCode, Json<BlackoutCreated>)> {
    let created = state.services.schedules.add_blackout(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Remove a blackout date
#[utoipa::path(
    delete,
    path = "/admin/availability/blackouts/{id}",
    tag = "availability",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Blackout ID")),
    responses(
        (status = 204, description = "Blackout removed"),
        (status = 404, description = "Unknown blackout", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_blackout(
    State(state): State<crate::AppState>,
    AdminUser(_claims): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<StatusCode> {
    state.services.schedules.remove_blackout(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
