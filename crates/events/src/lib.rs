//! EcoRide event bus and notification infrastructure.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the canonical domain event envelope.
//! - [`EventPersistence`]: background service that durably writes every
//!   event to the `events` table.
//! - [`Notifier`]: the best-effort notification collaborator, with an SMTP
//!   implementation ([`EmailNotifier`]) and a log-only fallback
//!   ([`LogNotifier`]).

pub mod bus;
pub mod delivery;
pub mod notifier;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailNotifier};
pub use notifier::{LogNotifier, Notification, NotificationTemplate, Notifier};
pub use persistence::EventPersistence;
