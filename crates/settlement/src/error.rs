use ecoride_core::error::CoreError;

/// Failure of a settlement operation. The surrounding transaction has been
/// rolled back when this is returned.
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type SettlementResult<T> = Result<T, SettlementError>;

/// Build an `InvariantViolation`, logging it at error level.
///
/// Reaching this means a guarded update failed while the row lock that
/// should have made it succeed was held.
pub(crate) fn invariant_violation(message: String) -> SettlementError {
    tracing::error!(%message, "Settlement invariant violated");
    CoreError::InvariantViolation(message).into()
}
