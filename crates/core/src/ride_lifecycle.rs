//! Ride lifecycle transition table.
//!
//! ```text
//! SCHEDULED --start--> STARTED --end--> FINISHED
//!     |                   |
//!     +------cancel-------+-----------> CANCELLED
//! ```
//!
//! Repeated or late actions are no-ops rather than errors so that a driver
//! double-clicking a button never corrupts state. The only rejected action
//! is cancelling a ride that already finished.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::RideStatus;

/// A driver-initiated lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideAction {
    Start,
    End,
    Cancel,
}

impl RideAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Cancel => "cancel",
        }
    }
}

/// What applying an action to the current status should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move the ride to the given status.
    Apply(RideStatus),
    /// Leave the ride untouched and report success.
    NoOp,
}

/// Resolve `action` against `current`.
pub fn plan(current: RideStatus, action: RideAction) -> Result<Transition, CoreError> {
    use RideStatus::*;

    let transition = match (action, current) {
        (RideAction::Start, Scheduled) => Transition::Apply(Started),
        (RideAction::Start, Started | Finished | Cancelled) => Transition::NoOp,

        (RideAction::End, Scheduled | Started) => Transition::Apply(Finished),
        (RideAction::End, Finished | Cancelled) => Transition::NoOp,

        (RideAction::Cancel, Scheduled | Started) => Transition::Apply(Cancelled),
        (RideAction::Cancel, Cancelled) => Transition::NoOp,
        (RideAction::Cancel, Finished) => {
            return Err(CoreError::InvalidTransition {
                from: current.as_str(),
                action: action.as_str(),
            })
        }
    };
    Ok(transition)
}
