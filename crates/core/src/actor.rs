//! Request-scoped identity passed explicitly into every core operation.
//!
//! The HTTP layer builds an [`Actor`] from the verified access token; the
//! state machines never read identity from anywhere else.

use crate::error::CoreError;
use crate::roles;
use crate::types::DbId;

/// The authenticated user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: String,
}

impl Actor {
    pub fn new(user_id: DbId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }

    pub fn is_staff(&self) -> bool {
        roles::is_staff(&self.role)
    }

    /// Fail with `Forbidden` unless this actor is the ride's driver.
    pub fn ensure_driver_of(&self, driver_id: DbId) -> Result<(), CoreError> {
        if self.user_id == driver_id {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "Only the ride's driver can change its status".into(),
            ))
        }
    }
}
