pub mod admin;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod me;
pub mod moderation;
pub mod reviews;
pub mod rides;
pub mod vehicles;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup                          signup (public)
/// /auth/login                           login (public)
///
/// /me                                   profile with balance
/// /me/rides                             rides I drive
/// /me/bookings                          my bookings
/// /me/ledger                            my credit movements
///
/// /vehicles                             list, register
///
/// /rides                                search (public), publish
/// /rides/{id}                           get (public)
/// /rides/{id}/price                     reprice (PUT, driver)
/// /rides/{id}/bookings                  book a seat (POST)
/// /rides/{id}/start|end|cancel          lifecycle (POST, driver)
///
/// /bookings/{id}/cancel                 passenger cancellation (POST)
///
/// /reviews                              submit with invitation token (POST)
/// /reviews/invitations/{token}          inspect an invitation
///
/// /moderation/reviews                   pending reviews (staff)
/// /moderation/reviews/{id}/approve      approve (POST, staff)
/// /moderation/reviews/{id}/reject       reject (POST, staff)
///
/// /admin/users/{id}/suspend             suspend (POST, admin)
/// /admin/users/{id}/unsuspend           unsuspend (POST, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/me", me::router())
        .nest("/vehicles", vehicles::router())
        .nest("/rides", rides::router())
        .nest("/bookings", bookings::router())
        .nest("/reviews", reviews::router())
        .nest("/moderation", moderation::router())
        .nest("/admin", admin::router())
}
