use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ProficiencyLevel {
    /// Step function over progress: >75 expert, >50 advanced, >25 intermediate.
    pub fn from_progress(progress: i32) -> Self {
        match progress {
            p if p > 75 => ProficiencyLevel::Expert,
            p if p > 50 => ProficiencyLevel::Advanced,
            p if p > 25 => ProficiencyLevel::Intermediate,
            _ => ProficiencyLevel::Beginner,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "beginner",
            ProficiencyLevel::Intermediate => "intermediate",
            ProficiencyLevel::Advanced => "advanced",
            ProficiencyLevel::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub skill_name: String,
    pub proficiency_level: String,
    pub progress: i32,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-skill counts across every student, for batch analytics.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct SkillDemandRow {
    pub skill_name: String,
    pub current_count: i64,
    pub learning_count: i64,
}
