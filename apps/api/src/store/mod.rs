//! Storage seam for every student-facing read and write.
//!
//! `AppState` carries an `Arc<dyn StudentStore>`; production uses
//! [`postgres::PgStudentStore`], tests substitute the in-memory store.

pub mod json_columns;
#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::activity::{ActivitySummaryRow, HeatmapDay, Platform};
use crate::models::placement::PlacementRow;
use crate::models::resume::ResumeInsights;
use crate::models::skill::{SkillDemandRow, SkillRow};
use crate::models::student::{ProfileInput, StudentRow};
use crate::models::training::TrainingProgram;
use crate::skills::reconcile::{SkillSnapshot, SkillWrite};

#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn find_student_by_user(&self, user_id: Uuid) -> Result<Option<StudentRow>, AppError>;

    /// Updates the user's student row, inserting it when absent, in one transaction.
    async fn upsert_profile(&self, user_id: Uuid, profile: &ProfileInput) -> Result<(), AppError>;

    /// Ordered by `is_current` desc, `progress` desc, then name.
    async fn list_skills(&self, student_id: Uuid) -> Result<Vec<SkillRow>, AppError>;

    /// Makes the stored skill set equal to `snapshot` atomically.
    /// On failure nothing is written. Returns the number of rows changed.
    async fn replace_skills(
        &self,
        student_id: Uuid,
        snapshot: &SkillSnapshot,
    ) -> Result<usize, AppError>;

    /// Inserts or updates one skill, leaving the others untouched.
    async fn upsert_skill(&self, student_id: Uuid, skill: &SkillWrite) -> Result<(), AppError>;

    /// Writes detected/missing skills to the latest resume's analysis,
    /// creating a placeholder resume when the student has none.
    async fn upsert_resume_skills(
        &self,
        student_id: Uuid,
        detected: &[String],
        missing: &[String],
    ) -> Result<Uuid, AppError>;

    /// Newest application first.
    async fn list_placements(&self, student_id: Uuid) -> Result<Vec<PlacementRow>, AppError>;

    async fn activity_summaries(&self, student_id: Uuid)
        -> Result<Vec<ActivitySummaryRow>, AppError>;

    /// Daily rows for one platform in ascending date order.
    async fn activity_heatmap(
        &self,
        student_id: Uuid,
        platform: Platform,
    ) -> Result<Vec<HeatmapDay>, AppError>;

    async fn latest_resume(&self, student_id: Uuid) -> Result<Option<ResumeInsights>, AppError>;

    /// Programs tagged with any of `skills`, easiest first.
    async fn training_for_skills(&self, skills: &[String])
        -> Result<Vec<TrainingProgram>, AppError>;

    async fn count_students(&self) -> Result<i64, AppError>;

    async fn skill_demand(&self) -> Result<Vec<SkillDemandRow>, AppError>;
}
