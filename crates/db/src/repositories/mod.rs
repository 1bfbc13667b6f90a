//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Read
//! methods accept any Postgres executor; lock and balance methods take
//! `&mut PgConnection` so they can only run inside a caller's transaction.

pub mod booking_repo;
pub mod event_repo;
pub mod ledger_repo;
pub mod review_repo;
pub mod ride_repo;
pub mod role_repo;
pub mod user_repo;
pub mod vehicle_repo;

pub use booking_repo::BookingRepo;
pub use event_repo::EventRepo;
pub use ledger_repo::LedgerRepo;
pub use review_repo::ReviewRepo;
pub use ride_repo::RideRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
pub use vehicle_repo::VehicleRepo;
