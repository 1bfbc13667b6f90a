//! Seat inventory rules.

use crate::error::CoreError;
use crate::types::DbId;

/// Smallest and largest passenger capacity a vehicle may declare.
pub const MIN_VEHICLE_SEATS: i32 = 1;
pub const MAX_VEHICLE_SEATS: i32 = 8;

/// Validate a vehicle's declared passenger capacity.
pub fn validate_capacity(seats: i32) -> Result<(), CoreError> {
    if !(MIN_VEHICLE_SEATS..=MAX_VEHICLE_SEATS).contains(&seats) {
        return Err(CoreError::Validation(format!(
            "Vehicle seats must be between {MIN_VEHICLE_SEATS} and {MAX_VEHICLE_SEATS}, got {seats}"
        )));
    }
    Ok(())
}

/// Validate the seats offered on a new ride against the vehicle's capacity.
pub fn validate_offered(offered: i32, capacity: i32) -> Result<(), CoreError> {
    if offered < 1 {
        return Err(CoreError::Validation(
            "A ride must offer at least one seat".into(),
        ));
    }
    if offered > capacity {
        return Err(CoreError::Validation(format!(
            "Cannot offer {offered} seats in a vehicle with {capacity}"
        )));
    }
    Ok(())
}

/// Fail with `NoSeatsAvailable` unless `n` seats remain.
pub fn ensure_available(ride_id: DbId, seats_left: i32, n: i32) -> Result<(), CoreError> {
    if seats_left < n {
        return Err(CoreError::NoSeatsAvailable { ride_id });
    }
    Ok(())
}
