//! Handlers for review invitations and submission.
//!
//! These routes authenticate with the invitation token rather than a
//! session: the token binds the ride and the passenger.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ecoride_core::error::CoreError;
use ecoride_core::review;
use ecoride_core::review_token::{ReviewClaims, TokenError};
use ecoride_core::status::RideStatus;
use ecoride_core::types::{DbId, Timestamp};
use ecoride_db::models::review::{CreateReview, Review};
use ecoride_db::models::ride::Ride;
use ecoride_db::repositories::{BookingRepo, ReviewRepo, RideRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /reviews`.
#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub token: String,
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

/// What an invitation grants, returned by `GET /reviews/invitations/{token}`.
#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub ride: Ride,
    pub passenger_id: DbId,
    pub expires_at: Timestamp,
}

/// GET /api/v1/reviews/invitations/{token}
pub async fn invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<InvitationResponse>>> {
    let claims = verify(&state, &token)?;
    let ride = finished_ride(&state, &claims).await?;
    Ok(Json(DataResponse {
        data: InvitationResponse {
            ride,
            passenger_id: claims.passenger_id,
            expires_at: claims.expires_at,
        },
    }))
}

/// POST /api/v1/reviews
///
/// Submit one review per (ride, passenger). Reviews start `pending` until
/// moderated.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitReviewRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Review>>)> {
    let claims = verify(&state, &input.token)?;
    review::validate_rating(input.rating)?;
    review::validate_comment(&input.comment)?;

    let ride = finished_ride(&state, &claims).await?;
    if BookingRepo::find_confirmed(&state.pool, ride.id, claims.passenger_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only passengers of this ride can review it".into(),
        )));
    }

    let created = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            ride_id: ride.id,
            passenger_id: claims.passenger_id,
            driver_id: ride.driver_id,
            rating: input.rating,
            comment: Some(input.comment.trim().to_string()).filter(|c| !c.is_empty()),
        },
    )
    .await?;
    tracing::info!(
        review_id = created.id,
        ride_id = ride.id,
        passenger_id = claims.passenger_id,
        "Review submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn verify(state: &AppState, token: &str) -> AppResult<ReviewClaims> {
    state.review_signer.verify(token).map_err(|e| {
        let message = match e {
            TokenError::Expired => "Review invitation has expired",
            TokenError::Invalid => "Review invitation is invalid",
        };
        AppError::Core(CoreError::Unauthorized(message.into()))
    })
}

async fn finished_ride(state: &AppState, claims: &ReviewClaims) -> AppResult<Ride> {
    let ride = RideRepo::find_by_id(&state.pool, claims.ride_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ride",
            id: claims.ride_id,
        }))?;
    if ride.status() != Some(RideStatus::Finished) {
        return Err(AppError::Core(CoreError::Validation(
            "Only finished rides can be reviewed".into(),
        )));
    }
    Ok(ride)
}
