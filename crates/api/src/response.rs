//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use ecoride_db::models::ride::Ride;
use ecoride_settlement::LifecycleOutcome;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Response for ride lifecycle actions.
///
/// `changed` is `false` for repeated actions. A non-empty `warnings` list
/// means the transition succeeded but a follow-up (e.g. emails) did not.
#[derive(Debug, Serialize)]
pub struct LifecycleResponse {
    pub data: Ride,
    pub changed: bool,
    pub warnings: Vec<String>,
}

impl From<LifecycleOutcome> for LifecycleResponse {
    fn from(outcome: LifecycleOutcome) -> Self {
        Self {
            data: outcome.ride,
            changed: outcome.changed,
            warnings: outcome.warnings,
        }
    }
}
