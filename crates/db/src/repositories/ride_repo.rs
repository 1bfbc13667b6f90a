//! Repository for the `rides` table.
//!
//! `seats_left` and `status_id` are written only by the settlement state
//! machines, inside a transaction that holds the ride row lock.

use ecoride_core::status::{RideStatus, StatusId};
use ecoride_core::types::{Credits, DbId};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::ride::{CreateRide, Ride, RideSearch};

/// Column list for rides queries.
const COLUMNS: &str = "id, driver_id, vehicle_id, from_city, to_city, date_start, date_end, \
    price, seats_left, status_id, created_at, updated_at";

/// Maximum page size for ride search.
const MAX_LIMIT: i64 = 100;

/// Default page size for ride search.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD, locking and seat inventory operations for rides.
pub struct RideRepo;

impl RideRepo {
    /// Insert a SCHEDULED ride, with `seats_left` set to the seats offered.
    pub async fn create(
        pool: &PgPool,
        driver_id: DbId,
        input: &CreateRide,
    ) -> Result<Ride, sqlx::Error> {
        let query = format!(
            "INSERT INTO rides
                (driver_id, vehicle_id, from_city, to_city, date_start, date_end,
                 price, seats_left, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ride>(&query)
            .bind(driver_id)
            .bind(input.vehicle_id)
            .bind(input.from_city.trim())
            .bind(input.to_city.trim())
            .bind(input.date_start)
            .bind(input.date_end)
            .bind(input.price)
            .bind(input.seats)
            .bind(RideStatus::Scheduled.id())
            .fetch_one(pool)
            .await
    }

    /// Find a ride by its primary key.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Ride>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rides WHERE id = $1");
        sqlx::query_as::<_, Ride>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Lock a ride row for the rest of the caller's transaction.
    ///
    /// Every operation that touches both a ride and a user takes this lock
    /// first. Concurrent bookings on the same ride serialize here.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Ride>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rides WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Ride>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Take `n` seats. Conditional on `seats_left >= n`, so the count can
    /// never go negative; returns `false` when no row matched.
    pub async fn decrement_seats(
        conn: &mut PgConnection,
        id: DbId,
        n: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE rides SET seats_left = seats_left - $2
             WHERE id = $1 AND seats_left >= $2",
        )
        .bind(id)
        .bind(n)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Return `n` seats. Returns `false` if the ride does not exist.
    pub async fn increment_seats(
        conn: &mut PgConnection,
        id: DbId,
        n: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE rides SET seats_left = seats_left + $2 WHERE id = $1")
            .bind(id)
            .bind(n)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the ride status, returning the updated row.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: RideStatus,
    ) -> Result<Ride, sqlx::Error> {
        let query = format!("UPDATE rides SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Ride>(&query)
            .bind(id)
            .bind(StatusId::from(status))
            .fetch_one(conn)
            .await
    }

    /// Change the per-seat price of a SCHEDULED ride owned by `driver_id`.
    ///
    /// Existing bookings keep their `credits_spent`. Returns `None` when the
    /// ride does not exist, is not the driver's, or is no longer scheduled.
    pub async fn update_price(
        pool: &PgPool,
        id: DbId,
        driver_id: DbId,
        price: Credits,
    ) -> Result<Option<Ride>, sqlx::Error> {
        let query = format!(
            "UPDATE rides SET price = $3
             WHERE id = $1 AND driver_id = $2 AND status_id = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ride>(&query)
            .bind(id)
            .bind(driver_id)
            .bind(price)
            .bind(RideStatus::Scheduled.id())
            .fetch_optional(pool)
            .await
    }

    /// Search bookable rides: SCHEDULED, in the future, with a free seat.
    ///
    /// City filters are case-insensitive exact matches; `date` matches the
    /// UTC departure day. Ordered by departure time.
    pub async fn search(pool: &PgPool, params: &RideSearch) -> Result<Vec<Ride>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let query = format!(
            "SELECT {COLUMNS} FROM rides
             WHERE status_id = $1
               AND seats_left > 0
               AND date_start > NOW()
               AND ($2::TEXT IS NULL OR lower(from_city) = lower($2))
               AND ($3::TEXT IS NULL OR lower(to_city) = lower($3))
               AND ($4::DATE IS NULL OR (date_start AT TIME ZONE 'UTC')::DATE = $4)
             ORDER BY date_start ASC, id ASC
             LIMIT $5"
        );
        sqlx::query_as::<_, Ride>(&query)
            .bind(RideStatus::Scheduled.id())
            .bind(params.from.as_deref().map(str::trim))
            .bind(params.to.as_deref().map(str::trim))
            .bind(params.date)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// List every ride published by a driver, most recent departure first.
    pub async fn list_by_driver(pool: &PgPool, driver_id: DbId) -> Result<Vec<Ride>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rides WHERE driver_id = $1 ORDER BY date_start DESC"
        );
        sqlx::query_as::<_, Ride>(&query)
            .bind(driver_id)
            .fetch_all(pool)
            .await
    }
}
