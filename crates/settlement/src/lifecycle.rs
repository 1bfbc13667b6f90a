//! Ride Lifecycle State Machine.
//!
//! Each action locks the ride row, checks that the actor is its driver and
//! resolves the action with [`ride_lifecycle::plan`]. Repeated actions are
//! no-ops that report `changed = false`. Side effects that cannot be rolled
//! back (events, emails) run after commit and only when the status changed.

use std::sync::Arc;

use ecoride_core::actor::Actor;
use ecoride_core::error::CoreError;
use ecoride_core::ride_lifecycle::{self, RideAction, Transition};
use ecoride_core::status::RideStatus;
use ecoride_core::types::DbId;
use ecoride_db::models::ride::Ride;
use ecoride_db::repositories::{BookingRepo, RideRepo};
use ecoride_events::bus::names;
use ecoride_events::{EventBus, NotificationTemplate, Notifier, PlatformEvent};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::booking::{cancel_bookings_for_ride, snapshot_ride};
use crate::error::SettlementResult;
use crate::invitations::ReviewInvitations;

/// Result of a lifecycle action.
#[derive(Debug, Clone, Serialize)]
pub struct LifecycleOutcome {
    /// The ride as committed.
    pub ride: Ride,
    /// `false` when the action was a no-op.
    pub changed: bool,
    /// Post-commit problems the driver should know about. The state change
    /// stands regardless.
    pub warnings: Vec<String>,
}

/// Starts, ends and cancels rides.
#[derive(Clone)]
pub struct RideLifecycle {
    pool: PgPool,
    event_bus: Arc<EventBus>,
    notifier: Arc<dyn Notifier>,
    invitations: ReviewInvitations,
}

impl RideLifecycle {
    pub fn new(
        pool: PgPool,
        event_bus: Arc<EventBus>,
        notifier: Arc<dyn Notifier>,
        invitations: ReviewInvitations,
    ) -> Self {
        Self {
            pool,
            event_bus,
            notifier,
            invitations,
        }
    }

    /// SCHEDULED → STARTED.
    pub async fn start(&self, actor: &Actor, ride_id: DbId) -> SettlementResult<LifecycleOutcome> {
        let mut tx = self.pool.begin().await?;
        let (ride, transition) = lock_and_plan(&mut tx, actor, ride_id, RideAction::Start).await?;

        let Transition::Apply(next) = transition else {
            tx.commit().await?;
            return Ok(unchanged(ride));
        };
        let ride = RideRepo::set_status(&mut tx, ride.id, next).await?;
        tx.commit().await?;

        tracing::info!(ride_id, driver_id = actor.user_id, "Ride started");
        self.publish(names::RIDE_STARTED, actor, &ride, serde_json::json!({}));

        Ok(LifecycleOutcome {
            ride,
            changed: true,
            warnings: Vec::new(),
        })
    }

    /// SCHEDULED or STARTED → FINISHED, then invite each confirmed
    /// passenger to review the driver.
    pub async fn end(&self, actor: &Actor, ride_id: DbId) -> SettlementResult<LifecycleOutcome> {
        let mut tx = self.pool.begin().await?;
        let (ride, transition) = lock_and_plan(&mut tx, actor, ride_id, RideAction::End).await?;

        let Transition::Apply(next) = transition else {
            tx.commit().await?;
            return Ok(unchanged(ride));
        };
        let ride = RideRepo::set_status(&mut tx, ride.id, next).await?;
        let passengers = BookingRepo::list_confirmed_passengers(&mut *tx, ride.id).await?;
        tx.commit().await?;

        tracing::info!(
            ride_id,
            driver_id = actor.user_id,
            passengers = passengers.len(),
            "Ride finished",
        );
        self.publish(
            names::RIDE_FINISHED,
            actor,
            &ride,
            serde_json::json!({ "passengers": passengers.len() }),
        );

        let report = self
            .invitations
            .send_all(self.notifier.as_ref(), &ride, &passengers)
            .await;
        let warnings = report.warning().into_iter().collect();

        Ok(LifecycleOutcome {
            ride,
            changed: true,
            warnings,
        })
    }

    /// SCHEDULED or STARTED → CANCELLED, refunding every confirmed booking
    /// in the same transaction, then notifying the refunded passengers.
    pub async fn cancel(&self, actor: &Actor, ride_id: DbId) -> SettlementResult<LifecycleOutcome> {
        let mut tx = self.pool.begin().await?;
        let (ride, transition) = lock_and_plan(&mut tx, actor, ride_id, RideAction::Cancel).await?;

        let Transition::Apply(next) = transition else {
            tx.commit().await?;
            return Ok(unchanged(ride));
        };
        let refunds = cancel_bookings_for_ride(&mut tx, ride.id).await?;
        let booking_ids: Vec<DbId> = refunds.iter().map(|r| r.booking_id).collect();
        let contacts = BookingRepo::contacts_for_bookings(&mut *tx, &booking_ids).await?;
        let ride = RideRepo::set_status(&mut tx, ride.id, next).await?;
        tx.commit().await?;

        let refunded_total: i64 = refunds.iter().map(|r| i64::from(r.amount)).sum();
        tracing::info!(
            ride_id,
            driver_id = actor.user_id,
            refunds = refunds.len(),
            refunded_total,
            "Ride cancelled",
        );
        self.publish(
            names::RIDE_CANCELLED,
            actor,
            &ride,
            serde_json::json!({ "refunds": refunds, "refunded_total": refunded_total }),
        );
        for refund in &refunds {
            self.event_bus.publish(
                PlatformEvent::new(names::BOOKING_CANCELLED)
                    .with_source("booking", refund.booking_id)
                    .with_actor(actor.user_id)
                    .with_payload(serde_json::json!({
                        "ride_id": ride.id,
                        "refunded": refund.amount,
                        "initiated_by": "driver",
                    })),
            );
        }

        let mut undelivered = 0usize;
        for contact in &contacts {
            let data = serde_json::json!({
                "username": contact.username,
                "from_city": ride.from_city,
                "to_city": ride.to_city,
                "refunded": contact.credits_spent,
            });
            if !self
                .notifier
                .send(&contact.email, NotificationTemplate::RideCancelled, &data)
                .await
            {
                tracing::warn!(
                    ride_id,
                    passenger_id = contact.passenger_id,
                    "Cancellation notice not delivered",
                );
                undelivered += 1;
            }
        }

        let mut warnings = Vec::new();
        if undelivered > 0 {
            warnings.push(format!(
                "Ride cancelled and refunds applied, but {undelivered} of {} passengers could not be notified",
                contacts.len()
            ));
        }

        Ok(LifecycleOutcome {
            ride,
            changed: true,
            warnings,
        })
    }

    fn publish(&self, event_type: &str, actor: &Actor, ride: &Ride, payload: serde_json::Value) {
        self.event_bus.publish(
            PlatformEvent::new(event_type)
                .with_source("ride", ride.id)
                .with_actor(actor.user_id)
                .with_payload(payload),
        );
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Lock the ride, enforce the driver guard and resolve `action`.
async fn lock_and_plan(
    conn: &mut PgConnection,
    actor: &Actor,
    ride_id: DbId,
    action: RideAction,
) -> SettlementResult<(Ride, Transition)> {
    let ride = RideRepo::lock_for_update(conn, ride_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Ride",
            id: ride_id,
        })?;
    actor.ensure_driver_of(ride.driver_id)?;

    let current: RideStatus = snapshot_ride(&ride)?.status;
    let transition = ride_lifecycle::plan(current, action)?;
    if transition == Transition::NoOp {
        tracing::debug!(
            ride_id,
            status = %current,
            action = action.as_str(),
            "Lifecycle action is a no-op",
        );
    }
    Ok((ride, transition))
}

fn unchanged(ride: Ride) -> LifecycleOutcome {
    LifecycleOutcome {
        ride,
        changed: false,
        warnings: Vec::new(),
    }
}
