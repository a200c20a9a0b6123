//! Read-only views over the student's latest resume.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::store::StudentStore;
use crate::student::profile::resolve_student;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSkills {
    pub extracted_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeStatus {
    pub has_resume: bool,
    pub file_name: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub analyzed: bool,
}

pub async fn resume_insights(
    store: &dyn StudentStore,
    user: &AuthUser,
) -> Result<ResumeSkills, AppError> {
    let student = resolve_student(store, user).await?;
    let skills = match store.latest_resume(student.id).await? {
        Some(resume) => ResumeSkills {
            extracted_skills: resume.detected_skills().to_vec(),
            missing_skills: resume.missing_skills().to_vec(),
        },
        None => ResumeSkills::default(),
    };
    Ok(skills)
}

/// The self-reported placeholder is not an upload and reports as no resume.
pub async fn resume_status(
    store: &dyn StudentStore,
    user: &AuthUser,
) -> Result<ResumeStatus, AppError> {
    let student = resolve_student(store, user).await?;
    let status = match store.latest_resume(student.id).await? {
        Some(resume) if resume.has_uploaded_file() => ResumeStatus {
            has_resume: true,
            analyzed: resume.analysis.is_some(),
            file_name: resume.file_name,
            uploaded_at: Some(resume.uploaded_at),
        },
        _ => ResumeStatus::default(),
    };
    Ok(status)
}
