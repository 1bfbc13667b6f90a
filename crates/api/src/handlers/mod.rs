pub mod admin;
pub mod auth;
pub mod bookings;
pub mod me;
pub mod moderation;
pub mod reviews;
pub mod rides;
pub mod vehicles;
