//! Public slot lookup

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::{availability::SlotQuery, SlotAnswer},
};

/// Opening hours, closure and booked ranges for one date
#[utoipa::path(
    get,
    path = "/availability/slots",
    tag = "availability",
    params(SlotQuery),
    responses(
        (status = 200, description = "Slot answer", body = SlotAnswer),
        (status = 400, description = "Missing or invalid date", body = crate::error::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_slots(
    State(state): State<crate::AppState>,
    WithRejection(Query(query), _): WithRejection<Query<SlotQuery>, AppError>,
) -> AppResult<Json<SlotAnswer>> {
    let answer = state
        .services
        .availability
        .resolve_raw(query.date.as_deref())
        .await?;
    Ok(Json(answer))
}
