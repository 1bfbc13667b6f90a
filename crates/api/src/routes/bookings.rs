use axum::routing::post;
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// POST /{id}/cancel  -> cancel (passenger)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/cancel", post(bookings::cancel))
}
