//! Repository for the `reviews` table.

use ecoride_core::review::STATUS_PENDING;
use ecoride_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, Review};

const COLUMNS: &str = "id, ride_id, passenger_id, driver_id, rating, comment, status, \
    moderated_by, created_at, moderated_at";

/// Stores submitted reviews and their moderation outcome.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a pending review. A second review for the same
    /// `(ride_id, passenger_id)` fails on `uq_reviews_ride_passenger`.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (ride_id, passenger_id, driver_id, rating, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.ride_id)
            .bind(input.passenger_id)
            .bind(input.driver_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Pending reviews, oldest first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews WHERE status = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(STATUS_PENDING)
            .fetch_all(pool)
            .await
    }

    /// Record a moderation decision on a pending review.
    ///
    /// Returns `None` if the review does not exist or was already moderated.
    pub async fn moderate(
        pool: &PgPool,
        id: DbId,
        status: &str,
        moderator_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE reviews SET status = $2, moderated_by = $3, moderated_at = NOW()
             WHERE id = $1 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(status)
            .bind(moderator_id)
            .bind(STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }
}
