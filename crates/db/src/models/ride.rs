//! Ride entity model and DTOs.

use chrono::NaiveDate;
use ecoride_core::status::{RideStatus, StatusId};
use ecoride_core::types::{Credits, DbId, Timestamp};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

/// A row from the `rides` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ride {
    pub id: DbId,
    pub driver_id: DbId,
    pub vehicle_id: DbId,
    pub from_city: String,
    pub to_city: String,
    pub date_start: Timestamp,
    pub date_end: Timestamp,
    /// Credits per seat.
    pub price: Credits,
    pub seats_left: i32,
    #[serde(rename = "status", serialize_with = "serialize_ride_status")]
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Ride {
    /// Decoded status, `None` if the row carries an unknown status id.
    pub fn status(&self) -> Option<RideStatus> {
        RideStatus::from_id(self.status_id)
    }
}

fn serialize_ride_status<S: Serializer>(id: &StatusId, s: S) -> Result<S::Ok, S::Error> {
    match RideStatus::from_id(*id) {
        Some(status) => status.serialize(s),
        None => s.serialize_i16(*id),
    }
}

/// DTO for publishing a ride.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRide {
    pub vehicle_id: DbId,
    pub from_city: String,
    pub to_city: String,
    pub date_start: Timestamp,
    pub date_end: Timestamp,
    pub price: Credits,
    /// Seats offered; becomes the initial `seats_left`.
    pub seats: i32,
}

/// Query parameters for ride search. All filters are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RideSearch {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Departure day (UTC).
    pub date: Option<NaiveDate>,
    pub limit: Option<i64>,
}
