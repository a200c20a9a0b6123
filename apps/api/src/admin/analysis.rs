//! Cohort-wide skill gap report for the placement cell.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::skill::SkillDemandRow;
use crate::store::StudentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPriority {
    Critical,
    High,
    Medium,
}

impl GapPriority {
    pub fn from_gap(gap: u32) -> Self {
        match gap {
            75.. => GapPriority::Critical,
            50..=74 => GapPriority::High,
            _ => GapPriority::Medium,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub skill: String,
    pub current_count: i64,
    pub learning_count: i64,
    /// Percentage of students tracking the skill who do not have it yet.
    pub gap: u32,
    pub priority: GapPriority,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillAnalysis {
    pub total_students: i64,
    pub skills: Vec<SkillGap>,
}

fn gap_percent(current: i64, learning: i64) -> u32 {
    let total = current + learning;
    if total <= 0 {
        return 0;
    }
    (100.0 * learning as f64 / total as f64).round() as u32
}

pub fn build_skill_analysis(total_students: i64, rows: Vec<SkillDemandRow>) -> SkillAnalysis {
    let mut skills: Vec<SkillGap> = rows
        .into_iter()
        .map(|row| {
            let gap = gap_percent(row.current_count, row.learning_count);
            SkillGap {
                skill: row.skill_name,
                current_count: row.current_count,
                learning_count: row.learning_count,
                gap,
                priority: GapPriority::from_gap(gap),
            }
        })
        .collect();
    skills.sort_by(|a, b| {
        b.learning_count
            .cmp(&a.learning_count)
            .then_with(|| a.skill.cmp(&b.skill))
    });
    SkillAnalysis {
        total_students,
        skills,
    }
}

pub async fn skill_analysis(store: &dyn StudentStore) -> Result<SkillAnalysis, AppError> {
    let (total_students, rows) = tokio::try_join!(store.count_students(), store.skill_demand())?;
    Ok(build_skill_analysis(total_students, rows))
}
