//! Handlers for the caller's own resources under `/me`.

use axum::extract::{Query, State};
use axum::Json;
use ecoride_core::error::CoreError;
use ecoride_db::models::booking::Booking;
use ecoride_db::models::ledger::LedgerEntry;
use ecoride_db::models::ride::Ride;
use ecoride_db::models::user::UserResponse;
use ecoride_db::repositories::{BookingRepo, LedgerRepo, RideRepo, RoleRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /me/ledger`.
#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/me
///
/// Profile with current credit balance.
pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    let role = RoleRepo::resolve_name(&state.pool, row.role_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from_user(row, role),
    }))
}

/// GET /api/v1/me/rides
///
/// Rides the caller publishes as a driver.
pub async fn my_rides(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Ride>>>> {
    let rides = RideRepo::list_by_driver(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: rides }))
}

/// GET /api/v1/me/bookings
pub async fn my_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let bookings = BookingRepo::list_by_passenger(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/me/ledger?limit=
///
/// Credit movements, newest first.
pub async fn my_ledger(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<LedgerQuery>,
) -> AppResult<Json<DataResponse<Vec<LedgerEntry>>>> {
    let entries = LedgerRepo::list_for_user(&state.pool, user.user_id, query.limit).await?;
    Ok(Json(DataResponse { data: entries }))
}
