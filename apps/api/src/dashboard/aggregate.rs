use tracing::{debug, warn};

use crate::auth::AuthUser;
use crate::dashboard::metrics::{placement_readiness, platform_stats, skill_coverage};
use crate::dashboard::models::{
    Dashboard, GithubData, LeetcodeData, PlacementView, ResumeInsightsView, SkillProgress,
};
use crate::errors::AppError;
use crate::models::activity::Platform;
use crate::store::StudentStore;
use crate::student::profile::resolve_student;

/// Builds the caller's dashboard. The six reads run concurrently and the
/// first failure aborts the whole call; nothing is written.
pub async fn build_dashboard(
    store: &dyn StudentStore,
    user: &AuthUser,
) -> Result<Dashboard, AppError> {
    let student = resolve_student(store, user).await?;
    let id = student.id;

    let (skills, placements, summaries, leetcode_days, github_days, resume) = tokio::try_join!(
        store.list_skills(id),
        store.list_placements(id),
        store.activity_summaries(id),
        store.activity_heatmap(id, Platform::Leetcode),
        store.activity_heatmap(id, Platform::Github),
        store.latest_resume(id)
    )
    .map_err(|e| {
        if e.is_storage_failure() {
            warn!("Dashboard read failed for student {id}; returning no partial data");
        }
        e
    })?;

    let missing = resume.as_ref().map(|r| r.missing_skills()).unwrap_or(&[]);
    let training_programs = if missing.is_empty() {
        Vec::new()
    } else {
        store.training_for_skills(missing).await?
    };

    let (current, learning): (Vec<_>, Vec<_>) = skills.iter().partition(|s| s.is_current);
    let leetcode = platform_stats(&summaries, Platform::Leetcode);
    let github = platform_stats(&summaries, Platform::Github);

    debug!(
        "Dashboard for student {id}: {} skill(s), {} placement(s), {} program(s)",
        skills.len(),
        placements.len(),
        training_programs.len()
    );

    Ok(Dashboard {
        placement_readiness: placement_readiness(resume.as_ref()),
        skill_coverage: skill_coverage(current.len(), learning.len()),
        leetcode_streak: leetcode.current_streak,
        github_streak: github.current_streak,
        current_skills: current.iter().map(|s| s.skill_name.clone()).collect(),
        skills_to_learn: learning.iter().map(|s| s.skill_name.clone()).collect(),
        skill_progress: learning
            .iter()
            .map(|s| SkillProgress {
                name: s.skill_name.clone(),
                progress: s.progress,
            })
            .collect(),
        leetcode_data: LeetcodeData::new(&leetcode, leetcode_days),
        github_data: GithubData::new(&github, github_days),
        resume_insights: resume.as_ref().map(ResumeInsightsView::from),
        placements: placements.into_iter().map(PlacementView::from).collect(),
        training_programs,
        name: student.name,
        branch: student.branch,
        semester: student.semester,
        cgpa: student.cgpa,
        roll_no: student.roll_no,
    })
}
