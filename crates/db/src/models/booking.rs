//! Booking entity model.

use ecoride_core::status::{BookingStatus, StatusId};
use ecoride_core::types::{Credits, DbId, Timestamp};
use serde::{Serialize, Serializer};
use sqlx::FromRow;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub ride_id: DbId,
    pub passenger_id: DbId,
    /// Ride price at confirmation time. Immutable.
    pub credits_spent: Credits,
    #[serde(rename = "status", serialize_with = "serialize_booking_status")]
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub cancelled_at: Option<Timestamp>,
}

impl Booking {
    pub fn status(&self) -> Option<BookingStatus> {
        BookingStatus::from_id(self.status_id)
    }
}

fn serialize_booking_status<S: Serializer>(id: &StatusId, s: S) -> Result<S::Ok, S::Error> {
    match BookingStatus::from_id(*id) {
        Some(status) => status.serialize(s),
        None => s.serialize_i16(*id),
    }
}

/// A confirmed passenger with the contact details notifications need.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PassengerContact {
    pub booking_id: DbId,
    pub passenger_id: DbId,
    pub username: String,
    pub email: String,
    pub credits_spent: Credits,
}
