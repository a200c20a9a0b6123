use axum::{extract::State, Json};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::ValidJson;
use crate::models::user::Role;
use crate::state::AppState;
use crate::student::profile::{
    get_profile, save_profile, ProfileRequest, ProfileResponse, SaveProfileResponse,
};

/// GET /api/student/profile
/// Any authenticated user; callers without a student row get 404.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    Ok(Json(get_profile(state.store.as_ref(), &user).await?))
}

/// POST /api/student/profile
pub async fn handle_save_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(req): ValidJson<ProfileRequest>,
) -> Result<Json<SaveProfileResponse>, AppError> {
    user.require_role(&[Role::Student])?;
    Ok(Json(save_profile(state.store.as_ref(), &user, req).await?))
}
