//! Handlers for bookings: confirming a seat and passenger cancellation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ecoride_core::types::DbId;
use ecoride_db::models::booking::Booking;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/rides/{id}/bookings
///
/// Book one seat, debiting the ride's current price.
pub async fn confirm(
    State(state): State<AppState>,
    user: AuthUser,
    Path(ride_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Booking>>)> {
    let booking = state.bookings.confirm(&user.actor(), ride_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// POST /api/v1/bookings/{id}/cancel
///
/// Cancel the caller's booking before departure with a full refund.
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(booking_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = state
        .bookings
        .cancel_by_passenger(&user.actor(), booking_id)
        .await?;
    Ok(Json(DataResponse { data: booking }))
}
