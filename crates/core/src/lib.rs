//! EcoRide domain rules.
//!
//! Everything in this crate is pure: no database, no network. The
//! transactional state machines in `ecoride-settlement` call into these
//! rules while holding row locks, and the API layer reuses them for
//! request validation.

pub mod actor;
pub mod booking;
pub mod error;
pub mod ledger;
pub mod review;
pub mod review_token;
pub mod ride;
pub mod ride_lifecycle;
pub mod roles;
pub mod seats;
pub mod status;
pub mod types;
