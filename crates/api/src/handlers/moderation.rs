//! Review moderation for employees and admins.

use axum::extract::{Path, State};
use axum::Json;
use ecoride_core::error::CoreError;
use ecoride_core::review::{self, STATUS_APPROVED, STATUS_REJECTED};
use ecoride_core::types::DbId;
use ecoride_db::models::review::Review;
use ecoride_db::repositories::ReviewRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/moderation/reviews
///
/// Pending reviews, oldest first.
pub async fn list_pending(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    let reviews = ReviewRepo::list_pending(&state.pool).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// POST /api/v1/moderation/reviews/{id}/approve
pub async fn approve(
    state: State<AppState>,
    staff: RequireStaff,
    id: Path<DbId>,
) -> AppResult<Json<DataResponse<Review>>> {
    moderate(state, staff, id, STATUS_APPROVED).await
}

/// POST /api/v1/moderation/reviews/{id}/reject
pub async fn reject(
    state: State<AppState>,
    staff: RequireStaff,
    id: Path<DbId>,
) -> AppResult<Json<DataResponse<Review>>> {
    moderate(state, staff, id, STATUS_REJECTED).await
}

async fn moderate(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
    decision: &str,
) -> AppResult<Json<DataResponse<Review>>> {
    let not_found = || AppError::Core(CoreError::NotFound { entity: "Review", id });

    let current = ReviewRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    review::validate_moderation(&current.status, decision)?;

    // `moderate` only matches pending rows; a concurrent decision wins.
    let moderated = ReviewRepo::moderate(&state.pool, id, decision, staff.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("Review has already been moderated".into()))
        })?;
    tracing::info!(review_id = id, moderator_id = staff.user_id, decision, "Review moderated");

    Ok(Json(DataResponse { data: moderated }))
}
