//! Route definitions for the `/rides` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{bookings, rides};
use crate::state::AppState;

/// Routes mounted at `/rides`.
///
/// ```text
/// GET  /                -> search
/// POST /                -> publish
/// GET  /{id}            -> get_by_id
/// PUT  /{id}/price      -> update_price
/// POST /{id}/bookings   -> bookings::confirm
/// POST /{id}/start      -> start
/// POST /{id}/end        -> end
/// POST /{id}/cancel     -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rides::search).post(rides::publish))
        .route("/{id}", get(rides::get_by_id))
        .route("/{id}/price", put(rides::update_price))
        .route("/{id}/bookings", post(bookings::confirm))
        .route("/{id}/start", post(rides::start))
        .route("/{id}/end", post(rides::end))
        .route("/{id}/cancel", post(rides::cancel))
}
