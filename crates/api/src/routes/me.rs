use axum::routing::get;
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// Routes mounted at `/me`. All require authentication.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(me::profile))
        .route("/rides", get(me::my_rides))
        .route("/bookings", get(me::my_bookings))
        .route("/ledger", get(me::my_ledger))
}
