use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::skills::reconcile::{
    CurrentSkillInput, LearningSkillInput, ProgressInput, SkillSnapshot, SkillWrite,
};
use crate::skills::views::{SkillGroups, SkillList};
use crate::store::StudentStore;
use crate::student::profile::resolve_student;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceSkillsRequest {
    #[serde(default)]
    pub current_skills: Vec<CurrentSkillInput>,
    #[serde(default)]
    pub learning_skills: Vec<LearningSkillInput>,
    /// Skills found in the resume; only written when present.
    #[serde(default)]
    pub extracted_skills: Option<Vec<String>>,
    #[serde(default)]
    pub missing_skills: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceSkillsResponse {
    pub message: String,
    #[serde(flatten)]
    pub skills: SkillGroups,
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveSkillRequest {
    #[serde(default)]
    pub skill_name: String,
    #[serde(default)]
    pub progress: Option<ProgressInput>,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Serialize)]
pub struct SaveSkillResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub skills: SkillList,
}

/// Replaces the caller's whole skill set with the submitted lists and answers
/// with what was actually persisted.
pub async fn replace_skills(
    store: &dyn StudentStore,
    user: &AuthUser,
    request: ReplaceSkillsRequest,
) -> Result<ReplaceSkillsResponse, AppError> {
    let snapshot = SkillSnapshot::from_inputs(&request.current_skills, &request.learning_skills)?;
    let student = resolve_student(store, user).await?;

    if snapshot.is_empty() {
        info!("Clearing all skills for student {}", student.id);
    }
    let changed = store.replace_skills(student.id, &snapshot).await?;
    info!("Skills reconciled for student {}: {changed} row(s) changed", student.id);

    if request.extracted_skills.is_some() || request.missing_skills.is_some() {
        sync_resume_skills(
            store,
            student.id,
            &request.extracted_skills.unwrap_or_default(),
            &request.missing_skills.unwrap_or_default(),
        )
        .await;
    }

    let rows = store.list_skills(student.id).await?;
    Ok(ReplaceSkillsResponse {
        message: "Skills saved".to_string(),
        skills: SkillGroups::from_rows(&rows),
    })
}

/// Best effort: the skill set is already committed, so a failure here is
/// logged and never reported to the caller.
async fn sync_resume_skills(
    store: &dyn StudentStore,
    student_id: Uuid,
    detected: &[String],
    missing: &[String],
) {
    match store.upsert_resume_skills(student_id, detected, missing).await {
        Ok(resume_id) => info!(
            "Recorded {} detected / {} missing skill(s) on resume {resume_id}",
            detected.len(),
            missing.len()
        ),
        Err(e) => warn!("Resume skills update failed for student {student_id}: {e}"),
    }
}

/// Upserts one skill without touching the rest of the set.
pub async fn save_skill(
    store: &dyn StudentStore,
    user: &AuthUser,
    request: SaveSkillRequest,
) -> Result<SaveSkillResponse, AppError> {
    let student = resolve_student(store, user).await?;
    let skill = SkillWrite::from_single(
        &request.skill_name,
        request.progress.as_ref(),
        request.is_current,
    )?;

    store.upsert_skill(student.id, &skill).await?;
    info!("Skill upserted for student {}: {}", student.id, skill.skill_name);

    let rows = store.list_skills(student.id).await?;
    Ok(SaveSkillResponse {
        success: true,
        message: "Skill saved successfully".to_string(),
        skills: SkillList::from_rows(&rows),
    })
}

pub async fn list_skills(store: &dyn StudentStore, user: &AuthUser) -> Result<SkillList, AppError> {
    let student = resolve_student(store, user).await?;
    let rows = store.list_skills(student.id).await?;
    Ok(SkillList::from_rows(&rows))
}
