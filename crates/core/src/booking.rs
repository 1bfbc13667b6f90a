//! Booking admission and cancellation rules.
//!
//! These checks run inside the settlement transaction against rows that are
//! already locked, in the same order the transaction acquires them: the
//! ride first, then the passenger.

use crate::error::CoreError;
use crate::ledger;
use crate::seats;
use crate::status::{BookingStatus, RideStatus};
use crate::types::{Credits, DbId};

/// The ride fields booking admission depends on, read under `FOR UPDATE`.
#[derive(Debug, Clone, Copy)]
pub struct RideSnapshot {
    pub id: DbId,
    pub driver_id: DbId,
    pub price: Credits,
    pub seats_left: i32,
    pub status: RideStatus,
}

/// The passenger fields booking admission depends on, read under `FOR UPDATE`.
#[derive(Debug, Clone, Copy)]
pub struct PassengerSnapshot {
    pub id: DbId,
    pub credits: Credits,
    pub is_suspended: bool,
}

/// Ride-side admission: only a SCHEDULED ride with a free seat accepts bookings.
///
/// Both failure cases surface as `NoSeatsAvailable`; a started, finished or
/// cancelled ride has no seats for sale.
pub fn check_ride_open(ride: &RideSnapshot) -> Result<(), CoreError> {
    if ride.status != RideStatus::Scheduled {
        return Err(CoreError::NoSeatsAvailable { ride_id: ride.id });
    }
    seats::ensure_available(ride.id, ride.seats_left, 1)
}

/// Passenger-side admission. Returns the price to debit, which is also the
/// `credits_spent` snapshot stored on the booking.
pub fn check_passenger(
    ride: &RideSnapshot,
    passenger: &PassengerSnapshot,
    already_booked: bool,
) -> Result<Credits, CoreError> {
    if passenger.is_suspended {
        return Err(CoreError::Forbidden("Suspended accounts cannot book rides".into()));
    }
    if passenger.id == ride.driver_id {
        return Err(CoreError::Validation(
            "Drivers cannot book a seat on their own ride".into(),
        ));
    }
    if already_booked {
        return Err(CoreError::Conflict(format!(
            "Passenger {} already holds a confirmed booking on ride {}",
            passenger.id, ride.id
        )));
    }
    ledger::ensure_sufficient(passenger.credits, ride.price)?;
    Ok(ride.price)
}

/// Rules for a passenger cancelling their own booking.
///
/// Only the booking's passenger may cancel it, only while it is CONFIRMED,
/// and only before the ride has started.
pub fn check_passenger_cancellation(
    actor_id: DbId,
    passenger_id: DbId,
    booking_status: BookingStatus,
    ride_status: RideStatus,
) -> Result<(), CoreError> {
    if actor_id != passenger_id {
        return Err(CoreError::Forbidden(
            "Only the passenger can cancel this booking".into(),
        ));
    }
    if booking_status != BookingStatus::Confirmed {
        return Err(CoreError::Conflict("Booking is already cancelled".into()));
    }
    if ride_status != RideStatus::Scheduled {
        return Err(CoreError::InvalidTransition {
            from: ride_status.as_str(),
            action: "cancel a booking on",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn ride(status: RideStatus, seats_left: i32, price: Credits) -> RideSnapshot {
        RideSnapshot {
            id: 10,
            driver_id: 1,
            price,
            seats_left,
            status,
        }
    }

    fn passenger(credits: Credits) -> PassengerSnapshot {
        PassengerSnapshot {
            id: 2,
            credits,
            is_suspended: false,
        }
    }

    #[test]
    fn scheduled_ride_with_seat_is_open() {
        assert!(check_ride_open(&ride(RideStatus::Scheduled, 1, 10)).is_ok());
    }

    #[test]
    fn full_ride_is_closed() {
        assert_matches!(
            check_ride_open(&ride(RideStatus::Scheduled, 0, 10)),
            Err(CoreError::NoSeatsAvailable { ride_id: 10 })
        );
    }

    #[test]
    fn non_scheduled_rides_are_closed() {
        for status in [RideStatus::Started, RideStatus::Finished, RideStatus::Cancelled] {
            assert_matches!(
                check_ride_open(&ride(status, 3, 10)),
                Err(CoreError::NoSeatsAvailable { .. })
            );
        }
    }

    #[test]
    fn admitted_passenger_pays_ride_price() {
        let r = ride(RideStatus::Scheduled, 1, 10);
        assert_eq!(check_passenger(&r, &passenger(10), false).unwrap(), 10);
    }

    #[test]
    fn free_ride_admits_empty_balance() {
        let r = ride(RideStatus::Scheduled, 1, 0);
        assert_eq!(check_passenger(&r, &passenger(0), false).unwrap(), 0);
    }

    #[test]
    fn short_balance_is_rejected() {
        let r = ride(RideStatus::Scheduled, 1, 10);
        assert_matches!(
            check_passenger(&r, &passenger(5), false),
            Err(CoreError::InsufficientCredits {
                required: 10,
                available: 5
            })
        );
    }

    #[test]
    fn driver_cannot_book_own_ride() {
        let r = ride(RideStatus::Scheduled, 1, 10);
        let driver = PassengerSnapshot {
            id: 1,
            credits: 50,
            is_suspended: false,
        };
        assert_matches!(
            check_passenger(&r, &driver, false),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn suspended_passenger_is_forbidden() {
        let r = ride(RideStatus::Scheduled, 1, 10);
        let p = PassengerSnapshot {
            is_suspended: true,
            ..passenger(50)
        };
        assert_matches!(check_passenger(&r, &p, false), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn second_booking_by_same_passenger_conflicts() {
        let r = ride(RideStatus::Scheduled, 2, 10);
        assert_matches!(
            check_passenger(&r, &passenger(50), true),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn passenger_can_cancel_before_departure() {
        assert!(check_passenger_cancellation(
            2,
            2,
            BookingStatus::Confirmed,
            RideStatus::Scheduled
        )
        .is_ok());
    }

    #[test]
    fn cancellation_rejected_for_other_users() {
        assert_matches!(
            check_passenger_cancellation(3, 2, BookingStatus::Confirmed, RideStatus::Scheduled),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn cancellation_rejected_after_departure() {
        assert_matches!(
            check_passenger_cancellation(2, 2, BookingStatus::Confirmed, RideStatus::Started),
            Err(CoreError::InvalidTransition { from: "started", .. })
        );
    }

    #[test]
    fn cancelled_booking_cannot_be_cancelled_again() {
        assert_matches!(
            check_passenger_cancellation(2, 2, BookingStatus::Cancelled, RideStatus::Scheduled),
            Err(CoreError::Conflict(_))
        );
    }
}
