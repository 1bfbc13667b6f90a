//! Credit ledger entry model.

use ecoride_core::ledger::LedgerReason;
use ecoride_core::types::{Credits, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `credit_ledger` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LedgerEntry {
    pub id: DbId,
    pub user_id: DbId,
    /// Signed change applied to `users.credits`.
    pub delta: Credits,
    pub reason: String,
    pub booking_id: Option<DbId>,
    pub ride_id: Option<DbId>,
    pub balance_after: Credits,
    pub created_at: Timestamp,
}

/// What a credit adjustment is for. Recorded alongside the delta.
#[derive(Debug, Clone, Copy)]
pub struct LedgerContext {
    pub reason: LedgerReason,
    pub booking_id: Option<DbId>,
    pub ride_id: Option<DbId>,
}
