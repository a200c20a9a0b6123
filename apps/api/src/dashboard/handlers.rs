use axum::{extract::State, Json};

use crate::auth::AuthUser;
use crate::dashboard::aggregate::build_dashboard;
use crate::dashboard::models::Dashboard;
use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;

/// GET /api/student/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Dashboard>, AppError> {
    user.require_role(&[Role::Student])?;
    Ok(Json(build_dashboard(state.store.as_ref(), &user).await?))
}
