use std::sync::Arc;

use chrono::Duration;
use ecoride_core::review_token::ReviewTokenSigner;
use ecoride_events::{EventBus, Notifier};
use ecoride_settlement::{BookingEngine, ReviewInvitations, RideLifecycle};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ecoride_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<EventBus>,
    /// Booking State Machine.
    pub bookings: BookingEngine,
    /// Ride Lifecycle State Machine.
    pub lifecycle: RideLifecycle,
    /// Verifies review invitation tokens.
    pub review_signer: ReviewTokenSigner,
}

impl AppState {
    /// Wire the state machines onto a pool, bus and notifier.
    pub fn new(
        pool: ecoride_db::DbPool,
        config: ServerConfig,
        event_bus: Arc<EventBus>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let review_signer = ReviewTokenSigner::new(&config.review.token_secret);
        let invitations = ReviewInvitations::new(
            review_signer.clone(),
            Duration::hours(config.review.token_ttl_hours),
            config.review.base_url.clone(),
        );

        Self {
            bookings: BookingEngine::new(pool.clone(), Arc::clone(&event_bus)),
            lifecycle: RideLifecycle::new(
                pool.clone(),
                Arc::clone(&event_bus),
                notifier,
                invitations,
            ),
            pool,
            config: Arc::new(config),
            event_bus,
            review_signer,
        }
    }
}
