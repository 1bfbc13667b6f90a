//! Handlers for the `/rides` resource: publishing, search, repricing and
//! the driver's lifecycle actions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use ecoride_core::error::CoreError;
use ecoride_core::types::{Credits, DbId};
use ecoride_core::{ride, seats};
use ecoride_db::models::ride::{CreateRide, Ride, RideSearch};
use ecoride_db::repositories::{RideRepo, UserRepo, VehicleRepo};
use ecoride_events::bus::names;
use ecoride_events::PlatformEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, LifecycleResponse};
use crate::state::AppState;

/// Request body for `PUT /rides/{id}/price`.
#[derive(Debug, Deserialize)]
pub struct UpdatePriceRequest {
    pub price: Credits,
}

/// POST /api/v1/rides
///
/// Publish a SCHEDULED ride on one of the caller's vehicles.
pub async fn publish(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateRide>,
) -> AppResult<(StatusCode, Json<DataResponse<Ride>>)> {
    let driver = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    if driver.is_suspended {
        return Err(AppError::Core(CoreError::Forbidden(
            "Suspended accounts cannot publish rides".into(),
        )));
    }

    let vehicle = VehicleRepo::find_by_id(&state.pool, input.vehicle_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Vehicle",
            id: input.vehicle_id,
        }))?;
    if vehicle.owner_id != driver.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Rides can only be published on your own vehicle".into(),
        )));
    }

    ride::validate_route(&input.from_city, &input.to_city)?;
    ride::validate_schedule(input.date_start, input.date_end, Utc::now())?;
    ride::validate_price(input.price)?;
    seats::validate_offered(input.seats, vehicle.seats)?;

    let created = RideRepo::create(&state.pool, driver.id, &input).await?;
    tracing::info!(
        ride_id = created.id,
        driver_id = driver.id,
        seats = created.seats_left,
        price = created.price,
        "Ride published",
    );
    state.event_bus.publish(
        PlatformEvent::new(names::RIDE_PUBLISHED)
            .with_source("ride", created.id)
            .with_actor(driver.id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/rides?from=&to=&date=&limit=
///
/// Bookable rides. Public.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<RideSearch>,
) -> AppResult<Json<DataResponse<Vec<Ride>>>> {
    let rides = RideRepo::search(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: rides }))
}

/// GET /api/v1/rides/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Ride>>> {
    let found = RideRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Ride", id }))?;
    Ok(Json(DataResponse { data: found }))
}

/// PUT /api/v1/rides/{id}/price
///
/// Reprice a SCHEDULED ride. Confirmed bookings keep what they paid.
pub async fn update_price(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePriceRequest>,
) -> AppResult<Json<DataResponse<Ride>>> {
    let existing = RideRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Ride", id }))?;
    if existing.driver_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the ride's driver can change its price".into(),
        )));
    }
    ride::validate_price(input.price)?;

    let updated = RideRepo::update_price(&state.pool, id, user.user_id, input.price)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Only scheduled rides can be repriced".into(),
            ))
        })?;
    tracing::info!(ride_id = id, price = updated.price, "Ride repriced");

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/rides/{id}/start
pub async fn start(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<LifecycleResponse>> {
    let outcome = state.lifecycle.start(&user.actor(), id).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/rides/{id}/end
///
/// Finishing a ride sends review invitations; delivery failures come back
/// as `warnings`.
pub async fn end(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<LifecycleResponse>> {
    let outcome = state.lifecycle.end(&user.actor(), id).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/rides/{id}/cancel
///
/// Cancels the ride and refunds every confirmed booking.
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<LifecycleResponse>> {
    let outcome = state.lifecycle.cancel(&user.actor(), id).await?;
    Ok(Json(outcome.into()))
}
