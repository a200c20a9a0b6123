use axum::{extract::State, Json};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::ValidJson;
use crate::models::user::Role;
use crate::skills::service::{
    list_skills, replace_skills, save_skill, ReplaceSkillsRequest, ReplaceSkillsResponse,
    SaveSkillRequest, SaveSkillResponse,
};
use crate::skills::views::SkillList;
use crate::state::AppState;

/// POST /api/student/skills
pub async fn handle_replace_skills(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(req): ValidJson<ReplaceSkillsRequest>,
) -> Result<Json<ReplaceSkillsResponse>, AppError> {
    user.require_role(&[Role::Student])?;
    Ok(Json(replace_skills(state.store.as_ref(), &user, req).await?))
}

/// POST /api/student/skill
pub async fn handle_save_skill(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(req): ValidJson<SaveSkillRequest>,
) -> Result<Json<SaveSkillResponse>, AppError> {
    user.require_role(&[Role::Student])?;
    Ok(Json(save_skill(state.store.as_ref(), &user, req).await?))
}

/// GET /api/student/skills-list
pub async fn handle_list_skills(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SkillList>, AppError> {
    user.require_role(&[Role::Student])?;
    Ok(Json(list_skills(state.store.as_ref(), &user).await?))
}
