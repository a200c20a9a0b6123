//! Reconciliation of a student's stored skills against a submitted snapshot.
//!
//! The snapshot is authoritative: every named skill is inserted or updated and
//! every stored skill it does not name is deleted. Planning is pure so both
//! storage backends apply exactly the same changes inside their transaction.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::skill::{ProficiencyLevel, SkillRow};

/// Progress as submitted: a JSON number (possibly fractional) or numeric text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProgressInput {
    Number(f64),
    Text(String),
}

impl From<i32> for ProgressInput {
    fn from(progress: i32) -> Self {
        ProgressInput::Number(f64::from(progress))
    }
}

/// A missing name deserializes as blank and the entry is skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentSkillInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub progress: Option<ProgressInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LearningSkillInput {
    #[serde(default)]
    pub name: String,
}

/// Desired persisted state of one skill. The level is always derived.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillWrite {
    pub skill_name: String,
    pub proficiency_level: ProficiencyLevel,
    pub progress: i32,
    pub is_current: bool,
}

impl SkillWrite {
    pub fn current(skill_name: impl Into<String>, progress: i32) -> Self {
        Self {
            skill_name: skill_name.into(),
            proficiency_level: ProficiencyLevel::from_progress(progress),
            progress,
            is_current: true,
        }
    }

    /// Skills still to be learned carry no progress.
    pub fn learning(skill_name: impl Into<String>) -> Self {
        Self {
            skill_name: skill_name.into(),
            proficiency_level: ProficiencyLevel::Beginner,
            progress: 0,
            is_current: false,
        }
    }

    /// Validates a single-skill submission.
    pub fn from_single(
        skill_name: &str,
        progress: Option<&ProgressInput>,
        is_current: bool,
    ) -> Result<Self, AppError> {
        let name = normalize_name(skill_name)
            .ok_or_else(|| AppError::Validation("Skill name required".to_string()))?;
        if is_current {
            let progress = validate_progress(&name, progress)?;
            Ok(Self::current(name, progress))
        } else {
            Ok(Self::learning(name))
        }
    }

    fn matches(&self, row: &SkillRow) -> bool {
        row.progress == self.progress
            && row.is_current == self.is_current
            && row.proficiency_level == self.proficiency_level.as_str()
    }
}

/// The complete skill set a student submitted, validated and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSnapshot {
    skills: Vec<SkillWrite>,
}

impl SkillSnapshot {
    /// Blank names are skipped. The first occurrence of a name wins and a name
    /// listed as both current and learning is kept as current.
    pub fn from_inputs(
        current: &[CurrentSkillInput],
        learning: &[LearningSkillInput],
    ) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        let mut skills = Vec::with_capacity(current.len() + learning.len());

        for input in current {
            let Some(name) = normalize_name(&input.name) else {
                continue;
            };
            let progress = validate_progress(&name, input.progress.as_ref())?;
            if seen.insert(name.clone()) {
                skills.push(SkillWrite::current(name, progress));
            }
        }
        for input in learning {
            let Some(name) = normalize_name(&input.name) else {
                continue;
            };
            if seen.insert(name.clone()) {
                skills.push(SkillWrite::learning(name));
            }
        }

        Ok(Self { skills })
    }

    pub fn skills(&self) -> &[SkillWrite] {
        &self.skills
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkillChange {
    Insert(SkillWrite),
    Update(SkillWrite),
    Delete(String),
}

/// Computes the writes that turn `existing` into `snapshot`.
/// Rows already matching the snapshot produce no change.
pub fn plan_skill_changes(existing: &[SkillRow], snapshot: &SkillSnapshot) -> Vec<SkillChange> {
    let by_name: HashMap<&str, &SkillRow> = existing
        .iter()
        .map(|row| (row.skill_name.as_str(), row))
        .collect();

    let mut changes = Vec::new();
    for skill in snapshot.skills() {
        match by_name.get(skill.skill_name.as_str()) {
            Some(row) if skill.matches(row) => {}
            Some(_) => changes.push(SkillChange::Update(skill.clone())),
            None => changes.push(SkillChange::Insert(skill.clone())),
        }
    }

    let wanted: HashSet<&str> = snapshot
        .skills()
        .iter()
        .map(|s| s.skill_name.as_str())
        .collect();
    for row in existing {
        if !wanted.contains(row.skill_name.as_str()) {
            changes.push(SkillChange::Delete(row.skill_name.clone()));
        }
    }

    changes
}

fn normalize_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Missing or blank progress is 0. Fractions round to the nearest integer,
/// which must fall within 0..=100.
fn validate_progress(name: &str, progress: Option<&ProgressInput>) -> Result<i32, AppError> {
    let value = match progress {
        None => 0.0,
        Some(ProgressInput::Number(n)) => *n,
        Some(ProgressInput::Text(text)) if text.trim().is_empty() => 0.0,
        Some(ProgressInput::Text(text)) => text.trim().parse::<f64>().map_err(|_| {
            AppError::Validation(format!("Progress for '{name}' must be a number, got '{text}'"))
        })?,
    };
    let rounded = value.round();
    if !rounded.is_finite() || !(0.0..=100.0).contains(&rounded) {
        return Err(AppError::Validation(format!(
            "Progress for '{name}' must be between 0 and 100, got {value}"
        )));
    }
    Ok(rounded as i32)
}
