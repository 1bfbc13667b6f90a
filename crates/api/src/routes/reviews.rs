use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Routes mounted at `/reviews`. Authenticated by invitation token.
///
/// ```text
/// POST /                      -> submit
/// GET  /invitations/{token}   -> invitation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(reviews::submit))
        .route("/invitations/{token}", get(reviews::invitation))
}
