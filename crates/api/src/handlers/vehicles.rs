//! Handlers for the `/vehicles` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ecoride_core::seats;
use ecoride_db::models::vehicle::{CreateVehicle, Vehicle};
use ecoride_db::repositories::VehicleRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /vehicles`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 50))]
    pub brand: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    #[validate(custom(function = "validate_energy"))]
    pub energy: String,
    pub seats: i32,
    #[validate(length(min = 2, max = 20))]
    pub plate: String,
}

const ENERGIES: [&str; 4] = ["petrol", "diesel", "hybrid", "electric"];

fn validate_energy(energy: &str) -> Result<(), validator::ValidationError> {
    if ENERGIES.contains(&energy) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("unknown_energy"))
    }
}

/// POST /api/v1/vehicles
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateVehicleRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Vehicle>>)> {
    input.validate()?;
    seats::validate_capacity(input.seats)?;

    let vehicle = VehicleRepo::create(
        &state.pool,
        user.user_id,
        &CreateVehicle {
            brand: input.brand,
            model: input.model,
            energy: input.energy,
            seats: input.seats,
            plate: input.plate,
        },
    )
    .await?;
    tracing::info!(vehicle_id = vehicle.id, owner_id = user.user_id, "Vehicle registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: vehicle })))
}

/// GET /api/v1/vehicles
///
/// The caller's vehicles.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Vehicle>>>> {
    let vehicles = VehicleRepo::list_by_owner(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: vehicles }))
}
