use serde::Serialize;

use crate::models::skill::SkillRow;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CurrentSkillView {
    pub name: String,
    pub progress: i32,
    pub level: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LearningSkillView {
    pub name: String,
}

/// Persisted skills split by `is_current`, in storage order.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillGroups {
    pub current_skills: Vec<CurrentSkillView>,
    pub learning_skills: Vec<LearningSkillView>,
}

impl SkillGroups {
    pub fn from_rows(rows: &[SkillRow]) -> Self {
        let (current, learning): (Vec<_>, Vec<_>) = rows.iter().partition(|r| r.is_current);
        Self {
            current_skills: current
                .into_iter()
                .map(|r| CurrentSkillView {
                    name: r.skill_name.clone(),
                    progress: r.progress,
                    level: r.proficiency_level.clone(),
                })
                .collect(),
            learning_skills: learning
                .into_iter()
                .map(|r| LearningSkillView {
                    name: r.skill_name.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoredSkillView {
    pub skill_name: String,
    pub progress: i32,
    pub proficiency_level: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PendingSkillView {
    pub skill_name: String,
}

/// Snake-case listing served by the single-skill endpoints.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SkillList {
    pub current_skills: Vec<StoredSkillView>,
    pub skills_to_learn: Vec<PendingSkillView>,
}

impl SkillList {
    pub fn from_rows(rows: &[SkillRow]) -> Self {
        let (current, learning): (Vec<_>, Vec<_>) = rows.iter().partition(|r| r.is_current);
        Self {
            current_skills: current
                .into_iter()
                .map(|r| StoredSkillView {
                    skill_name: r.skill_name.clone(),
                    progress: r.progress,
                    proficiency_level: r.proficiency_level.clone(),
                })
                .collect(),
            skills_to_learn: learning
                .into_iter()
                .map(|r| PendingSkillView {
                    skill_name: r.skill_name.clone(),
                })
                .collect(),
        }
    }
}
