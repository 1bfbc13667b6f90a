//! Repository for the `vehicles` table.

use ecoride_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::vehicle::{CreateVehicle, Vehicle};

const COLUMNS: &str = "id, owner_id, brand, model, energy, seats, plate, created_at";

/// Provides CRUD operations for vehicles.
pub struct VehicleRepo;

impl VehicleRepo {
    /// Register a vehicle for `owner_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateVehicle,
    ) -> Result<Vehicle, sqlx::Error> {
        let query = format!(
            "INSERT INTO vehicles (owner_id, brand, model, energy, seats, plate)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(owner_id)
            .bind(input.brand.trim())
            .bind(input.model.trim())
            .bind(&input.energy)
            .bind(input.seats)
            .bind(input.plate.trim().to_uppercase())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles WHERE id = $1");
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List a driver's vehicles, oldest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles WHERE owner_id = $1 ORDER BY id");
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
