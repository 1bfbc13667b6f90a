//! Repository for the append-only `credit_ledger` table.
//!
//! This is the only code that writes `users.credits`.

use ecoride_core::types::{Credits, DbId};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::ledger::{LedgerContext, LedgerEntry};

const COLUMNS: &str = "id, user_id, delta, reason, booking_id, ride_id, balance_after, created_at";

/// Maximum page size for ledger history.
const MAX_LIMIT: i64 = 200;

/// Atomic credit adjustment and ledger history.
pub struct LedgerRepo;

impl LedgerRepo {
    /// Add `delta` to the user's balance and append the matching ledger entry
    /// in a single statement.
    ///
    /// The update is guarded by `credits + delta >= 0`; when the guard fails
    /// nothing is written and `None` is returned. Callers debit only after
    /// reading the balance under [`UserRepo::lock_for_update`], so `None`
    /// signals a broken invariant rather than a user error.
    ///
    /// [`UserRepo::lock_for_update`]: crate::repositories::UserRepo::lock_for_update
    pub async fn adjust_credits(
        conn: &mut PgConnection,
        user_id: DbId,
        delta: Credits,
        context: LedgerContext,
    ) -> Result<Option<LedgerEntry>, sqlx::Error> {
        let query = format!(
            "WITH updated AS (
                UPDATE users SET credits = credits + $2
                WHERE id = $1 AND credits + $2 >= 0
                RETURNING id, credits
             )
             INSERT INTO credit_ledger (user_id, delta, reason, booking_id, ride_id, balance_after)
             SELECT id, $2, $3, $4, $5, credits FROM updated
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LedgerEntry>(&query)
            .bind(user_id)
            .bind(delta)
            .bind(context.reason.as_str())
            .bind(context.booking_id)
            .bind(context.ride_id)
            .fetch_optional(conn)
            .await
    }

    /// A user's ledger entries, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<LedgerEntry>, sqlx::Error> {
        let limit = limit.unwrap_or(MAX_LIMIT).clamp(1, MAX_LIMIT);
        let query = format!(
            "SELECT {COLUMNS} FROM credit_ledger
             WHERE user_id = $1
             ORDER BY id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, LedgerEntry>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Sum of all deltas recorded for a user.
    pub async fn sum_for_user(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COALESCE(SUM(delta), 0)::BIGINT FROM credit_ledger WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(executor)
                .await?;
        Ok(row.0)
    }
}
