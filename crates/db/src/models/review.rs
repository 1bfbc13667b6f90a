//! Review entity model and DTOs.

use ecoride_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub ride_id: DbId,
    pub passenger_id: DbId,
    pub driver_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
    /// `pending`, `approved` or `rejected`.
    pub status: String,
    pub moderated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub moderated_at: Option<Timestamp>,
}

/// DTO for inserting a review once the invitation token has been verified.
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub ride_id: DbId,
    pub passenger_id: DbId,
    pub driver_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
}
