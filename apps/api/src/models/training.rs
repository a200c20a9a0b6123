use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::json_columns::decode_string_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingProgramRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub skill_tags: Option<Value>,
    pub provider: Option<String>,
    pub duration_hours: Option<i32>,
    pub difficulty: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgram {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub skill_tags: Vec<String>,
    pub provider: Option<String>,
    pub duration_hours: Option<i32>,
    pub difficulty: Difficulty,
    pub url: Option<String>,
}

impl TrainingProgram {
    pub fn covers_any(&self, skills: &[String]) -> bool {
        self.skill_tags.iter().any(|tag| skills.contains(tag))
    }
}

impl From<TrainingProgramRow> for TrainingProgram {
    fn from(row: TrainingProgramRow) -> Self {
        let difficulty = row.difficulty.parse().unwrap_or_else(|e| {
            tracing::warn!("training program {}: {e}; treating as beginner", row.id);
            Difficulty::Beginner
        });
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            skill_tags: decode_string_list("skill_tags", row.skill_tags),
            provider: row.provider,
            duration_hours: row.duration_hours,
            difficulty,
            url: row.url,
        }
    }
}

/// Orders recommendations by ascending difficulty, then title.
pub fn sort_by_difficulty(programs: &mut [TrainingProgram]) {
    programs.sort_by(|a, b| a.difficulty.cmp(&b.difficulty).then_with(|| a.title.cmp(&b.title)));
}
