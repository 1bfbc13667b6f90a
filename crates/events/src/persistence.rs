//! Copies every bus event into the `events` table.

use ecoride_core::types::DbId;
use ecoride_db::repositories::EventRepo;
use ecoride_db::DbPool;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::bus::PlatformEvent;

pub struct EventPersistence;

impl EventPersistence {
    /// Drain `receiver` into the database. Returns once the bus is dropped.
    ///
    /// A write failure is logged and the event is skipped; settlement has
    /// already committed by the time an event is published.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<PlatformEvent>) {
        let mut stored: u64 = 0;
        let mut lost: u64 = 0;

        loop {
            let event = match receiver.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    lost += skipped;
                    tracing::warn!(skipped, "Event log fell behind the bus");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            match Self::persist(&pool, &event).await {
                Ok(_) => stored += 1,
                Err(e) => {
                    lost += 1;
                    tracing::error!(error = %e, event_type = %event.event_type, "Event not recorded");
                }
            }
        }

        tracing::info!(stored, lost, "Event log stopped");
    }

    /// Insert one event. An event name missing from `event_types` is
    /// reported as `RowNotFound`.
    pub async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<DbId, sqlx::Error> {
        let Some(event_type) = EventRepo::get_event_type_by_name(pool, &event.event_type).await?
        else {
            return Err(sqlx::Error::RowNotFound);
        };

        EventRepo::insert(
            pool,
            event_type.id,
            event.source_entity_type.as_deref(),
            event.source_entity_id,
            event.actor_user_id,
            &event.payload,
        )
        .await
    }
}
