//! Ride publishing rules.

use crate::error::CoreError;
use crate::types::{Credits, Timestamp};

/// Upper bound on a per-seat price, in credits.
pub const MAX_PRICE: Credits = 500;

/// Maximum length of a city name.
pub const MAX_CITY_LENGTH: usize = 100;

/// Validate origin and destination city names.
pub fn validate_route(from_city: &str, to_city: &str) -> Result<(), CoreError> {
    let from = from_city.trim();
    let to = to_city.trim();
    if from.is_empty() || to.is_empty() {
        return Err(CoreError::Validation(
            "Departure and arrival cities are required".into(),
        ));
    }
    if from.len() > MAX_CITY_LENGTH || to.len() > MAX_CITY_LENGTH {
        return Err(CoreError::Validation(format!(
            "City names must be at most {MAX_CITY_LENGTH} characters"
        )));
    }
    if from.eq_ignore_ascii_case(to) {
        return Err(CoreError::Validation(
            "Departure and arrival cities must differ".into(),
        ));
    }
    Ok(())
}

/// Validate departure/arrival times. Departure must be in the future.
pub fn validate_schedule(
    date_start: Timestamp,
    date_end: Timestamp,
    now: Timestamp,
) -> Result<(), CoreError> {
    if date_start <= now {
        return Err(CoreError::Validation(
            "Departure must be in the future".into(),
        ));
    }
    if date_end <= date_start {
        return Err(CoreError::Validation(
            "Arrival must be after departure".into(),
        ));
    }
    Ok(())
}

/// Validate the per-seat price.
pub fn validate_price(price: Credits) -> Result<(), CoreError> {
    if !(0..=MAX_PRICE).contains(&price) {
        return Err(CoreError::Validation(format!(
            "Price must be between 0 and {MAX_PRICE} credits"
        )));
    }
    Ok(())
}
