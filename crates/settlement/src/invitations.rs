//! Review-Invitation Trigger.
//!
//! When a ride finishes, each confirmed passenger receives a signed,
//! time-limited link binding `(ride_id, passenger_id)`. Delivery is
//! best-effort and never affects the ride's status.

use chrono::Duration;
use ecoride_core::review_token::ReviewTokenSigner;
use ecoride_core::types::DbId;
use ecoride_db::models::booking::PassengerContact;
use ecoride_db::models::ride::Ride;
use ecoride_events::{NotificationTemplate, Notifier};
use serde::Serialize;

/// Delivery result of one invitation round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvitationReport {
    pub sent: usize,
    /// Passengers whose invitation could not be delivered.
    pub failed: Vec<DbId>,
}

impl InvitationReport {
    /// Human-readable warning when some deliveries failed.
    pub fn warning(&self) -> Option<String> {
        if self.failed.is_empty() {
            return None;
        }
        Some(format!(
            "Ride finished, but review invitations could not be sent to {} of {} passengers",
            self.failed.len(),
            self.sent + self.failed.len()
        ))
    }
}

/// Issues review links and hands them to the notifier.
#[derive(Debug, Clone)]
pub struct ReviewInvitations {
    signer: ReviewTokenSigner,
    ttl: Duration,
    base_url: String,
}

impl ReviewInvitations {
    pub fn new(signer: ReviewTokenSigner, ttl: Duration, base_url: impl Into<String>) -> Self {
        Self {
            signer,
            ttl,
            base_url: base_url.into(),
        }
    }

    pub fn signer(&self) -> &ReviewTokenSigner {
        &self.signer
    }

    /// Invitation link for one passenger, carrying a fresh token.
    pub fn link(&self, ride_id: DbId, passenger_id: DbId) -> String {
        let token = self.signer.issue(ride_id, passenger_id, self.ttl);
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{separator}token={token}", self.base_url)
    }

    /// Send one invitation per passenger. Never fails; undelivered
    /// invitations are reported instead.
    pub async fn send_all(
        &self,
        notifier: &dyn Notifier,
        ride: &Ride,
        passengers: &[PassengerContact],
    ) -> InvitationReport {
        let mut report = InvitationReport::default();

        for passenger in passengers {
            let data = serde_json::json!({
                "username": passenger.username,
                "from_city": ride.from_city,
                "to_city": ride.to_city,
                "link": self.link(ride.id, passenger.passenger_id),
            });
            if notifier
                .send(&passenger.email, NotificationTemplate::ReviewInvitation, &data)
                .await
            {
                report.sent += 1;
            } else {
                tracing::warn!(
                    ride_id = ride.id,
                    passenger_id = passenger.passenger_id,
                    "Review invitation not delivered",
                );
                report.failed.push(passenger.passenger_id);
            }
        }

        report
    }
}
