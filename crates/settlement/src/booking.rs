//! Booking State Machine.
//!
//! `confirm` locks the ride, then the passenger, validates admission under
//! those locks, and writes the booking, the seat decrement and the debit in
//! the same transaction. Any failure drops the transaction, which rolls
//! everything back.

use std::sync::Arc;

use ecoride_core::actor::Actor;
use ecoride_core::booking::{self, PassengerSnapshot, RideSnapshot};
use ecoride_core::error::CoreError;
use ecoride_core::ledger::{self, LedgerReason};
use ecoride_core::types::{Credits, DbId};
use ecoride_db::models::booking::Booking;
use ecoride_db::models::ledger::{LedgerContext, LedgerEntry};
use ecoride_db::models::ride::Ride;
use ecoride_db::repositories::{BookingRepo, LedgerRepo, RideRepo, UserRepo};
use ecoride_events::bus::names;
use ecoride_events::{EventBus, PlatformEvent};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::error::{invariant_violation, SettlementResult};

/// A refunded booking, produced by a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Refund {
    pub booking_id: DbId,
    pub passenger_id: DbId,
    pub amount: Credits,
}

/// Confirms and cancels bookings.
#[derive(Clone)]
pub struct BookingEngine {
    pool: PgPool,
    event_bus: Arc<EventBus>,
}

impl BookingEngine {
    pub fn new(pool: PgPool, event_bus: Arc<EventBus>) -> Self {
        Self { pool, event_bus }
    }

    /// Book one seat on `ride_id` for the acting passenger, debiting the
    /// ride's current price.
    pub async fn confirm(&self, actor: &Actor, ride_id: DbId) -> SettlementResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let ride = RideRepo::lock_for_update(&mut tx, ride_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Ride",
                id: ride_id,
            })?;
        let ride_snapshot = snapshot_ride(&ride)?;
        booking::check_ride_open(&ride_snapshot)?;

        let passenger = UserRepo::lock_for_update(&mut tx, actor.user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: actor.user_id,
            })?;
        let already_booked = BookingRepo::find_confirmed(&mut *tx, ride.id, passenger.id)
            .await?
            .is_some();
        let price = booking::check_passenger(
            &ride_snapshot,
            &PassengerSnapshot {
                id: passenger.id,
                credits: passenger.credits,
                is_suspended: passenger.is_suspended,
            },
            already_booked,
        )?;

        let balance_after = ledger::apply(passenger.credits, ledger::debit(price)).ok_or_else(|| {
            invariant_violation(format!(
                "debit of {price} overdraws user {} (balance {})",
                passenger.id, passenger.credits
            ))
        })?;

        let booking = BookingRepo::insert_confirmed(&mut tx, ride.id, passenger.id, price).await?;

        if !RideRepo::decrement_seats(&mut tx, ride.id, 1).await? {
            return Err(invariant_violation(format!(
                "seat decrement failed on ride {} under lock (seats_left was {})",
                ride.id, ride.seats_left
            )));
        }

        let context = LedgerContext {
            reason: LedgerReason::BookingDebit,
            booking_id: Some(booking.id),
            ride_id: Some(ride.id),
        };
        let entry = LedgerRepo::adjust_credits(&mut tx, passenger.id, ledger::debit(price), context)
            .await?;
        ensure_balance(entry.as_ref(), passenger.id, balance_after)?;

        tx.commit().await?;

        tracing::info!(
            booking_id = booking.id,
            ride_id = ride.id,
            passenger_id = passenger.id,
            credits_spent = price,
            "Booking confirmed",
        );
        self.event_bus.publish(
            PlatformEvent::new(names::BOOKING_CONFIRMED)
                .with_source("booking", booking.id)
                .with_actor(actor.user_id)
                .with_payload(serde_json::json!({
                    "ride_id": ride.id,
                    "credits_spent": price,
                })),
        );

        Ok(booking)
    }

    /// Cancel the acting passenger's own booking before the ride starts,
    /// refunding `credits_spent` in full and returning the seat.
    pub async fn cancel_by_passenger(
        &self,
        actor: &Actor,
        booking_id: DbId,
    ) -> SettlementResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let not_found = || CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        };
        let ride_id = BookingRepo::find_by_id(&mut *tx, booking_id)
            .await?
            .ok_or_else(not_found)?
            .ride_id;

        // Every booking mutation holds the ride lock, so the booking read
        // below is stable until commit.
        let ride = RideRepo::lock_for_update(&mut tx, ride_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Ride",
                id: ride_id,
            })?;
        let current = BookingRepo::find_by_id(&mut *tx, booking_id)
            .await?
            .ok_or_else(not_found)?;

        let booking_status = current.status().ok_or_else(|| {
            CoreError::Internal(format!("Unknown booking status id {}", current.status_id))
        })?;
        booking::check_passenger_cancellation(
            actor.user_id,
            current.passenger_id,
            booking_status,
            snapshot_ride(&ride)?.status,
        )?;

        let passenger = UserRepo::lock_for_update(&mut tx, current.passenger_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: current.passenger_id,
            })?;

        let refund = refund_booking(&mut tx, &current, passenger.credits).await?;
        if !RideRepo::increment_seats(&mut tx, ride.id, 1).await? {
            return Err(invariant_violation(format!(
                "seat return failed on locked ride {}",
                ride.id
            )));
        }

        let cancelled = BookingRepo::find_by_id(&mut *tx, booking_id)
            .await?
            .ok_or_else(not_found)?;
        tx.commit().await?;

        tracing::info!(
            booking_id,
            ride_id = ride.id,
            passenger_id = refund.passenger_id,
            refunded = refund.amount,
            "Booking cancelled by passenger",
        );
        self.event_bus.publish(
            PlatformEvent::new(names::BOOKING_CANCELLED)
                .with_source("booking", booking_id)
                .with_actor(actor.user_id)
                .with_payload(serde_json::json!({
                    "ride_id": ride.id,
                    "refunded": refund.amount,
                    "initiated_by": "passenger",
                })),
        );

        Ok(cancelled)
    }
}

/// Refund and cancel every CONFIRMED booking on a ride, then return the
/// freed seats to its inventory.
///
/// The caller must already hold the ride row lock in `conn`'s transaction.
/// Passenger rows are locked in ascending id order.
pub async fn cancel_bookings_for_ride(
    conn: &mut PgConnection,
    ride_id: DbId,
) -> SettlementResult<Vec<Refund>> {
    let bookings = BookingRepo::lock_confirmed_for_ride(&mut *conn, ride_id).await?;
    let mut refunds = Vec::with_capacity(bookings.len());

    for booking in &bookings {
        let passenger = UserRepo::lock_for_update(&mut *conn, booking.passenger_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: booking.passenger_id,
            })?;
        refunds.push(refund_booking(&mut *conn, booking, passenger.credits).await?);
    }

    let seats = i32::try_from(refunds.len())
        .map_err(|_| invariant_violation(format!("too many bookings on ride {ride_id}")))?;
    if seats > 0 && !RideRepo::increment_seats(&mut *conn, ride_id, seats).await? {
        return Err(invariant_violation(format!(
            "seat return failed on locked ride {ride_id}"
        )));
    }

    Ok(refunds)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mark one booking cancelled and credit its `credits_spent` back.
/// `balance` is the passenger's balance read under the row lock.
async fn refund_booking(
    conn: &mut PgConnection,
    booking: &Booking,
    balance: Credits,
) -> SettlementResult<Refund> {
    if !BookingRepo::mark_cancelled(&mut *conn, booking.id).await? {
        return Err(invariant_violation(format!(
            "booking {} was not confirmed under the ride lock",
            booking.id
        )));
    }

    let context = LedgerContext {
        reason: LedgerReason::BookingRefund,
        booking_id: Some(booking.id),
        ride_id: Some(booking.ride_id),
    };
    let delta = ledger::credit(booking.credits_spent);
    let balance_after = ledger::apply(balance, delta).ok_or_else(|| {
        invariant_violation(format!(
            "refund of {} overflows the balance of user {}",
            booking.credits_spent, booking.passenger_id
        ))
    })?;
    let entry = LedgerRepo::adjust_credits(&mut *conn, booking.passenger_id, delta, context).await?;
    ensure_balance(entry.as_ref(), booking.passenger_id, balance_after)?;

    Ok(Refund {
        booking_id: booking.id,
        passenger_id: booking.passenger_id,
        amount: booking.credits_spent,
    })
}

/// The ledger write must have happened and landed on the balance computed
/// from the locked row.
fn ensure_balance(
    entry: Option<&LedgerEntry>,
    user_id: DbId,
    expected: Credits,
) -> SettlementResult<()> {
    match entry {
        Some(entry) if entry.balance_after == expected => Ok(()),
        Some(entry) => Err(invariant_violation(format!(
            "user {user_id} balance is {} after ledger write, expected {expected}",
            entry.balance_after
        ))),
        None => Err(invariant_violation(format!(
            "guarded balance update rejected for user {user_id} under lock"
        ))),
    }
}

/// Decode the ride fields admission depends on.
pub(crate) fn snapshot_ride(ride: &Ride) -> Result<RideSnapshot, CoreError> {
    let status = ride.status().ok_or_else(|| {
        CoreError::Internal(format!("Unknown ride status id {}", ride.status_id))
    })?;
    Ok(RideSnapshot {
        id: ride.id,
        driver_id: ride.driver_id,
        price: ride.price,
        seats_left: ride.seats_left,
        status,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;
    use crate::SettlementError;

    fn entry(balance_after: Credits) -> LedgerEntry {
        LedgerEntry {
            id: 1,
            user_id: 7,
            delta: -5,
            reason: LedgerReason::BookingDebit.as_str().to_string(),
            booking_id: Some(3),
            ride_id: Some(2),
            balance_after,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn matching_balance_is_accepted() {
        assert!(ensure_balance(Some(&entry(15)), 7, 15).is_ok());
    }

    #[test]
    fn drifted_balance_is_an_invariant_violation() {
        assert_matches!(
            ensure_balance(Some(&entry(14)), 7, 15),
            Err(SettlementError::Core(CoreError::InvariantViolation(_)))
        );
    }

    #[test]
    fn rejected_update_is_an_invariant_violation() {
        assert_matches!(
            ensure_balance(None, 7, 15),
            Err(SettlementError::Core(CoreError::InvariantViolation(_)))
        );
    }
}
