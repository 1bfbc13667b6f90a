//! Repository for the `roles` lookup table.

use sqlx::PgPool;

/// Resolves role ids to names.
pub struct RoleRepo;

impl RoleRepo {
    /// Resolve a role id to its name. Fails with `RowNotFound` for unknown ids.
    pub async fn resolve_name(pool: &PgPool, role_id: i16) -> Result<String, sqlx::Error> {
        let row: (String,) = sqlx::query_as("SELECT name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
