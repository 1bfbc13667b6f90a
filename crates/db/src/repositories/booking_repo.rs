//! Repository for the `bookings` table.

use ecoride_core::status::BookingStatus;
use ecoride_core::types::{Credits, DbId};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::booking::{Booking, PassengerContact};

/// Column list for bookings queries.
const COLUMNS: &str = "id, ride_id, passenger_id, credits_spent, status_id, created_at, cancelled_at";

/// Provides insert, lookup and cancellation for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a CONFIRMED booking. `credits_spent` is the ride price read
    /// under the ride lock.
    pub async fn insert_confirmed(
        conn: &mut PgConnection,
        ride_id: DbId,
        passenger_id: DbId,
        credits_spent: Credits,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings (ride_id, passenger_id, credits_spent, status_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(ride_id)
            .bind(passenger_id)
            .bind(credits_spent)
            .bind(BookingStatus::Confirmed.id())
            .fetch_one(conn)
            .await
    }

    /// Find a booking by id, in any status.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// The passenger's CONFIRMED booking on a ride, if any.
    pub async fn find_confirmed(
        executor: impl PgExecutor<'_>,
        ride_id: DbId,
        passenger_id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE ride_id = $1 AND passenger_id = $2 AND status_id = $3"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(ride_id)
            .bind(passenger_id)
            .bind(BookingStatus::Confirmed.id())
            .fetch_optional(executor)
            .await
    }

    /// Lock every CONFIRMED booking on a ride, ordered by passenger id so
    /// refund cascades take user locks in a consistent order.
    pub async fn lock_confirmed_for_ride(
        conn: &mut PgConnection,
        ride_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE ride_id = $1 AND status_id = $2
             ORDER BY passenger_id ASC, id ASC
             FOR UPDATE"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(ride_id)
            .bind(BookingStatus::Confirmed.id())
            .fetch_all(conn)
            .await
    }

    /// Mark a CONFIRMED booking as CANCELLED. Returns `false` if the booking
    /// was not confirmed.
    pub async fn mark_cancelled(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bookings SET status_id = $2, cancelled_at = NOW()
             WHERE id = $1 AND status_id = $3",
        )
        .bind(id)
        .bind(BookingStatus::Cancelled.id())
        .bind(BookingStatus::Confirmed.id())
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Confirmed passengers of a ride with their contact details.
    pub async fn list_confirmed_passengers(
        executor: impl PgExecutor<'_>,
        ride_id: DbId,
    ) -> Result<Vec<PassengerContact>, sqlx::Error> {
        sqlx::query_as::<_, PassengerContact>(
            "SELECT b.id AS booking_id, u.id AS passenger_id, u.username, u.email, b.credits_spent
             FROM bookings b
             JOIN users u ON u.id = b.passenger_id
             WHERE b.ride_id = $1 AND b.status_id = $2
             ORDER BY u.id",
        )
        .bind(ride_id)
        .bind(BookingStatus::Confirmed.id())
        .fetch_all(executor)
        .await
    }

    /// Contact details for a set of passengers, in id order.
    pub async fn contacts_for_bookings(
        executor: impl PgExecutor<'_>,
        booking_ids: &[DbId],
    ) -> Result<Vec<PassengerContact>, sqlx::Error> {
        sqlx::query_as::<_, PassengerContact>(
            "SELECT b.id AS booking_id, u.id AS passenger_id, u.username, u.email, b.credits_spent
             FROM bookings b
             JOIN users u ON u.id = b.passenger_id
             WHERE b.id = ANY($1)
             ORDER BY u.id",
        )
        .bind(booking_ids)
        .fetch_all(executor)
        .await
    }

    /// All bookings of a passenger, newest first.
    pub async fn list_by_passenger(
        pool: &PgPool,
        passenger_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE passenger_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(passenger_id)
            .fetch_all(pool)
            .await
    }

    /// All bookings on a ride, any status.
    pub async fn list_by_ride(pool: &PgPool, ride_id: DbId) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE ride_id = $1 ORDER BY id");
        sqlx::query_as::<_, Booking>(&query)
            .bind(ride_id)
            .fetch_all(pool)
            .await
    }
}
