//! Admin-only account management.

use axum::extract::{Path, State};
use axum::Json;
use ecoride_core::error::CoreError;
use ecoride_core::types::DbId;
use ecoride_db::models::user::UserResponse;
use ecoride_db::repositories::{RoleRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/users/{id}/suspend
///
/// A suspended user can neither log in, book nor publish rides.
pub async fn suspend(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Admins cannot suspend themselves".into(),
        )));
    }
    set_suspended(&state, id, true, admin.user_id).await
}

/// POST /api/v1/admin/users/{id}/unsuspend
pub async fn unsuspend(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    set_suspended(&state, id, false, admin.user_id).await
}

async fn set_suspended(
    state: &AppState,
    id: DbId,
    suspended: bool,
    admin_id: DbId,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::set_suspended(&state.pool, id, suspended)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    tracing::info!(user_id = id, admin_id, suspended, "Account suspension changed");

    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from_user(user, role),
    }))
}
