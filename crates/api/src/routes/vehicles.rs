use axum::routing::get;
use axum::Router;

use crate::handlers::vehicles;
use crate::state::AppState;

/// Routes mounted at `/vehicles`.
///
/// ```text
/// GET  /   -> list (caller's vehicles)
/// POST /   -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(vehicles::list).post(vehicles::create))
}
