//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts where the API creates rows

pub mod booking;
pub mod event;
pub mod ledger;
pub mod review;
pub mod ride;
pub mod user;
pub mod vehicle;

pub use ecoride_core::status::StatusId;
