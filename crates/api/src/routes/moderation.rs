use axum::routing::{get, post};
use axum::Router;

use crate::handlers::moderation;
use crate::state::AppState;

/// Routes mounted at `/moderation`. Employee or admin only.
///
/// ```text
/// GET  /reviews                -> list_pending
/// POST /reviews/{id}/approve   -> approve
/// POST /reviews/{id}/reject    -> reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(moderation::list_pending))
        .route("/reviews/{id}/approve", post(moderation::approve))
        .route("/reviews/{id}/reject", post(moderation::reject))
}
