//! Fixtures shared by the settlement integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use ecoride_core::actor::Actor;
use ecoride_core::review_token::ReviewTokenSigner;
use ecoride_core::roles::{DEFAULT_ROLE_ID, ROLE_USER};
use ecoride_core::types::{Credits, DbId};
use ecoride_db::models::ride::{CreateRide, Ride};
use ecoride_db::models::user::{CreateUser, User};
use ecoride_db::models::vehicle::CreateVehicle;
use ecoride_db::repositories::{RideRepo, UserRepo, VehicleRepo};
use ecoride_events::{EventBus, NotificationTemplate, Notifier};
use ecoride_settlement::{BookingEngine, ReviewInvitations, RideLifecycle};
use serde_json::Value;
use sqlx::PgPool;

pub const REVIEW_SECRET: &str = "settlement-test-review-secret";

static PLATE_SEQ: AtomicUsize = AtomicUsize::new(1);

/// Create a regular user with the starting grant.
pub async fn user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: "not-a-real-hash".to_string(),
            role_id: DEFAULT_ROLE_ID,
        },
    )
    .await
    .expect("user should insert")
}

/// Overwrite a balance directly. Bypasses the ledger, so tests that check
/// ledger sums must not use it.
pub async fn set_credits(pool: &PgPool, user_id: DbId, credits: Credits) {
    sqlx::query("UPDATE users SET credits = $2 WHERE id = $1")
        .bind(user_id)
        .bind(credits)
        .execute(pool)
        .await
        .expect("credits update should succeed");
}

pub async fn credits_of(pool: &PgPool, user_id: DbId) -> Credits {
    UserRepo::find_by_id(pool, user_id)
        .await
        .expect("query should succeed")
        .expect("user should exist")
        .credits
}

/// Publish a scheduled ride departing tomorrow, on a fresh vehicle.
pub async fn ride(pool: &PgPool, driver_id: DbId, price: Credits, seats: i32) -> Ride {
    let plate = format!("TS-{:04}-EC", PLATE_SEQ.fetch_add(1, Ordering::Relaxed));
    let vehicle = VehicleRepo::create(
        pool,
        driver_id,
        &CreateVehicle {
            brand: "Renault".to_string(),
            model: "Zoe".to_string(),
            energy: "electric".to_string(),
            seats: 8,
            plate,
        },
    )
    .await
    .expect("vehicle should insert");

    let date_start = Utc::now() + Duration::days(1);
    RideRepo::create(
        pool,
        driver_id,
        &CreateRide {
            vehicle_id: vehicle.id,
            from_city: "Paris".to_string(),
            to_city: "Lyon".to_string(),
            date_start,
            date_end: date_start + Duration::hours(5),
            price,
            seats,
        },
    )
    .await
    .expect("ride should insert")
}

pub async fn reload_ride(pool: &PgPool, ride_id: DbId) -> Ride {
    RideRepo::find_by_id(pool, ride_id)
        .await
        .expect("query should succeed")
        .expect("ride should exist")
}

pub fn actor(user: &User) -> Actor {
    Actor::new(user.id, ROLE_USER)
}

pub fn engine(pool: &PgPool) -> BookingEngine {
    BookingEngine::new(pool.clone(), Arc::new(EventBus::default()))
}

pub fn invitations() -> ReviewInvitations {
    ReviewInvitations::new(
        ReviewTokenSigner::new(REVIEW_SECRET),
        Duration::hours(1),
        "https://ecoride.test/reviews/new",
    )
}

pub fn lifecycle(pool: &PgPool, notifier: Arc<RecordingNotifier>) -> RideLifecycle {
    lifecycle_with_bus(pool, notifier, Arc::new(EventBus::default()))
}

pub fn lifecycle_with_bus(
    pool: &PgPool,
    notifier: Arc<RecordingNotifier>,
    bus: Arc<EventBus>,
) -> RideLifecycle {
    RideLifecycle::new(pool.clone(), bus, notifier, invitations())
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

/// A message captured by [`RecordingNotifier`].
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub recipient: String,
    pub template: NotificationTemplate,
    pub data: Value,
}

/// Records every send and reports a fixed delivery result.
pub struct RecordingNotifier {
    deliver: bool,
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingNotifier {
    pub fn delivering() -> Arc<Self> {
        Arc::new(Self {
            deliver: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            deliver: false,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, recipient: &str, template: NotificationTemplate, data: &Value) -> bool {
        self.sent.lock().unwrap().push(SentMessage {
            recipient: recipient.to_string(),
            template,
            data: data.clone(),
        });
        self.deliver
    }
}
