use axum::{extract::State, Json};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::Role;
use crate::resume::{resume_insights, resume_status, ResumeSkills, ResumeStatus};
use crate::state::AppState;

/// GET /api/student/resume-insights
pub async fn handle_resume_insights(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ResumeSkills>, AppError> {
    user.require_role(&[Role::Student])?;
    Ok(Json(resume_insights(state.store.as_ref(), &user).await?))
}

/// GET /api/student/resume/status
pub async fn handle_resume_status(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ResumeStatus>, AppError> {
    user.require_role(&[Role::Student])?;
    Ok(Json(resume_status(state.store.as_ref(), &user).await?))
}
