use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Admin only.
///
/// ```text
/// POST /users/{id}/suspend    -> suspend
/// POST /users/{id}/unsuspend  -> unsuspend
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{id}/suspend", post(admin::suspend))
        .route("/users/{id}/unsuspend", post(admin::unsuspend))
}
