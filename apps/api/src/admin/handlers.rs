use axum::{extract::State, Json};

use crate::admin::analysis::{skill_analysis, SkillAnalysis};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;

/// GET /api/admin/skill-analysis
pub async fn handle_skill_analysis(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SkillAnalysis>, AppError> {
    user.require_role(&[Role::Admin, Role::PlacementCell])?;
    Ok(Json(skill_analysis(state.store.as_ref()).await?))
}
