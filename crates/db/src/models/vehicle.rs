//! Vehicle entity model and DTOs.

use ecoride_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `vehicles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vehicle {
    pub id: DbId,
    pub owner_id: DbId,
    pub brand: String,
    pub model: String,
    pub energy: String,
    /// Passenger capacity.
    pub seats: i32,
    pub plate: String,
    pub created_at: Timestamp,
}

/// DTO for registering a vehicle.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVehicle {
    pub brand: String,
    pub model: String,
    pub energy: String,
    pub seats: i32,
    pub plate: String,
}
