pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{admin, dashboard, resume, skills, student};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Student profile & skills
        .route(
            "/api/student/profile",
            get(student::handlers::handle_get_profile)
                .post(student::handlers::handle_save_profile),
        )
        .route(
            "/api/student/skills",
            post(skills::handlers::handle_replace_skills),
        )
        .route("/api/student/skill", post(skills::handlers::handle_save_skill))
        .route(
            "/api/student/skills-list",
            get(skills::handlers::handle_list_skills),
        )
        // Read models
        .route(
            "/api/student/dashboard",
            get(dashboard::handlers::handle_dashboard),
        )
        .route(
            "/api/student/resume-insights",
            get(resume::handlers::handle_resume_insights),
        )
        .route(
            "/api/student/resume/status",
            get(resume::handlers::handle_resume_status),
        )
        // Admin
        .route(
            "/api/admin/skill-analysis",
            get(admin::handlers::handle_skill_analysis),
        )
        .with_state(state)
}
