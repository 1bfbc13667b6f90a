//! Event persistence against a real database.

use std::sync::Arc;

use ecoride_db::repositories::EventRepo;
use ecoride_events::bus::names;
use ecoride_events::{EventBus, EventPersistence, PlatformEvent};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn persist_writes_known_event_types(pool: PgPool) {
    let event = PlatformEvent::new(names::RIDE_CANCELLED)
        .with_source("ride", 17)
        .with_payload(serde_json::json!({ "refunded_total": 25 }));

    let id = EventPersistence::persist(&pool, &event).await.unwrap();

    let stored = EventRepo::list_for_source(&pool, "ride", 17).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, id);
    assert_eq!(stored[0].payload["refunded_total"], 25);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_event_type_is_rejected(pool: PgPool) {
    let result = EventPersistence::persist(&pool, &PlatformEvent::new("ride.teleported")).await;
    assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn run_drains_the_bus_until_closed(pool: PgPool) {
    let bus = Arc::new(EventBus::default());
    let handle = tokio::spawn(EventPersistence::run(pool.clone(), bus.subscribe()));

    bus.publish(PlatformEvent::new(names::BOOKING_CONFIRMED).with_source("booking", 3));
    bus.publish(PlatformEvent::new(names::BOOKING_CANCELLED).with_source("booking", 3));
    drop(bus);
    handle.await.unwrap();

    let stored = EventRepo::list_for_source(&pool, "booking", 3).await.unwrap();
    assert_eq!(stored.len(), 2);
}
