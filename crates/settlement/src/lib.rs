//! Transactional state machines for EcoRide.
//!
//! - [`BookingEngine`] turns a passenger's request into a confirmed booking
//!   (one seat taken, the ride price debited) or changes nothing.
//! - [`RideLifecycle`] drives a ride through
//!   SCHEDULED → STARTED → FINISHED, or to CANCELLED with a refund cascade.
//! - [`ReviewInvitations`] issues signed review links once a ride finishes.
//!
//! Every operation runs in one database transaction that locks the ride row
//! first and passenger rows second. Events and notifications happen only
//! after commit.

pub mod booking;
pub mod error;
pub mod invitations;
pub mod lifecycle;

pub use booking::{BookingEngine, Refund};
pub use error::{SettlementError, SettlementResult};
pub use invitations::{InvitationReport, ReviewInvitations};
pub use lifecycle::{LifecycleOutcome, RideLifecycle};
