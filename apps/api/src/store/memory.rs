//! In-memory `StudentStore` for tests, with switches that inject storage
//! failures into specific operations.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::activity::{ActivitySummaryRow, HeatmapDay, Platform};
use crate::models::placement::PlacementRow;
use crate::models::resume::{ResumeAnalysis, ResumeInsights, SELF_REPORTED_FILE_NAME};
use crate::models::skill::{SkillDemandRow, SkillRow};
use crate::models::student::{ProfileInput, StudentRow};
use crate::models::training::{sort_by_difficulty, TrainingProgram, TrainingProgramRow};
use crate::skills::reconcile::{plan_skill_changes, SkillChange, SkillSnapshot, SkillWrite};
use crate::store::StudentStore;

#[derive(Default, Clone)]
struct Tables {
    students: Vec<StudentRow>,
    skills: Vec<SkillRow>,
    placements: Vec<PlacementRow>,
    summaries: Vec<(Uuid, ActivitySummaryRow)>,
    days: Vec<(Uuid, Platform, HeatmapDay)>,
    resumes: Vec<(Uuid, ResumeInsights)>,
    programs: Vec<TrainingProgram>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_reads: AtomicBool,
    fail_resume_writes: AtomicBool,
    fail_skill_writes: AtomicBool,
    training_queries: AtomicUsize,
}

fn injected(operation: &str) -> AppError {
    AppError::Internal(anyhow!("injected failure in {operation}"))
}

fn skill_row(student_id: Uuid, skill: &SkillWrite) -> SkillRow {
    SkillRow {
        id: Uuid::new_v4(),
        student_id,
        skill_name: skill.skill_name.clone(),
        proficiency_level: skill.proficiency_level.as_str().to_string(),
        progress: skill.progress,
        is_current: skill.is_current,
        created_at: Utc::now(),
    }
}

fn apply_write(rows: &mut Vec<SkillRow>, student_id: Uuid, skill: &SkillWrite) {
    match rows
        .iter_mut()
        .find(|r| r.student_id == student_id && r.skill_name == skill.skill_name)
    {
        Some(row) => {
            row.proficiency_level = skill.proficiency_level.as_str().to_string();
            row.progress = skill.progress;
            row.is_current = skill.is_current;
        }
        None => rows.push(skill_row(student_id, skill)),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }

    fn check_reads(&self, operation: &str) -> Result<(), AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected(operation));
        }
        Ok(())
    }

    /// Every read after this call fails, except the student lookup.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_resume_writes(&self) {
        self.fail_resume_writes.store(true, Ordering::SeqCst);
    }

    /// Skill replaces apply part of their plan, then fail.
    pub fn fail_skill_writes(&self) {
        self.fail_skill_writes.store(true, Ordering::SeqCst);
    }

    /// Number of catalog lookups served so far.
    pub fn training_queries(&self) -> usize {
        self.training_queries.load(Ordering::SeqCst)
    }

    pub fn seed_student(&self, user_id: Uuid, name: &str) -> StudentRow {
        let now = Utc::now();
        let row = StudentRow {
            id: Uuid::new_v4(),
            user_id,
            roll_no: "CS2021001".to_string(),
            name: name.to_string(),
            branch: "Computer Science".to_string(),
            joined_year: 2021,
            semester: 6,
            cgpa: Some(8.5),
            created_at: now,
            updated_at: now,
        };
        self.tables().students.push(row.clone());
        row
    }

    pub fn seed_skill(&self, student_id: Uuid, skill: SkillWrite) {
        apply_write(&mut self.tables().skills, student_id, &skill);
    }

    pub fn seed_placement(
        &self,
        student_id: Uuid,
        company: &str,
        status: &str,
        applied: NaiveDate,
    ) {
        self.tables().placements.push(PlacementRow {
            id: Uuid::new_v4(),
            student_id,
            company_name: Some(company.to_string()),
            role_offered: Some("SDE Intern".to_string()),
            package_lpa: Some(12.0),
            status: status.to_string(),
            applied_date: Some(applied),
            result_date: None,
            created_at: Utc::now(),
        });
    }

    pub fn seed_activity(&self, student_id: Uuid, summary: ActivitySummaryRow) {
        self.tables().summaries.push((student_id, summary));
    }

    pub fn seed_day(&self, student_id: Uuid, platform: Platform, date: NaiveDate, count: i32) {
        self.tables()
            .days
            .push((student_id, platform, HeatmapDay { date, count }));
    }

    /// Adds a resume; `analysis` holds (overall score, detected, missing).
    pub fn seed_resume(
        &self,
        student_id: Uuid,
        file_url: Option<&str>,
        uploaded_at: DateTime<Utc>,
        analysis: Option<(i32, Vec<&str>, Vec<&str>)>,
    ) -> Uuid {
        let resume_id = Uuid::new_v4();
        let analysis = analysis.map(|(score, detected, missing)| ResumeAnalysis {
            overall_score: score,
            detected_skills: detected.into_iter().map(String::from).collect(),
            missing_skills: missing.into_iter().map(String::from).collect(),
            suggestions: vec![Value::String("Quantify project impact".to_string())],
            analyzed_at: uploaded_at,
        });
        self.tables().resumes.push((
            student_id,
            ResumeInsights {
                resume_id,
                file_url: file_url.map(String::from),
                file_name: file_url.map(|u| u.rsplit('/').next().unwrap_or(u).to_string()),
                uploaded_at,
                analysis,
            },
        ));
        resume_id
    }

    /// Adds a catalog entry; `tags` may be an array or JSON-encoded text.
    pub fn seed_program(&self, title: &str, difficulty: &str, tags: Value) -> Uuid {
        let program = TrainingProgram::from(TrainingProgramRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: Some(format!("{title} course")),
            skill_tags: Some(tags),
            provider: Some("Coursera".to_string()),
            duration_hours: Some(20),
            difficulty: difficulty.to_string(),
            url: None,
        });
        let id = program.id;
        self.tables().programs.push(program);
        id
    }

    pub fn skills_of(&self, student_id: Uuid) -> Vec<SkillRow> {
        let mut rows: Vec<_> = self
            .tables()
            .skills
            .iter()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.is_current
                .cmp(&a.is_current)
                .then(b.progress.cmp(&a.progress))
                .then_with(|| a.skill_name.cmp(&b.skill_name))
        });
        rows
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn find_student_by_user(&self, user_id: Uuid) -> Result<Option<StudentRow>, AppError> {
        Ok(self
            .tables()
            .students
            .iter()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn upsert_profile(&self, user_id: Uuid, profile: &ProfileInput) -> Result<(), AppError> {
        let now = Utc::now();
        let mut tables = self.tables();
        match tables.students.iter_mut().find(|s| s.user_id == user_id) {
            Some(row) => {
                row.roll_no = profile.roll_no.clone();
                row.name = profile.name.clone();
                row.branch = profile.branch.clone();
                row.joined_year = profile.joined_year;
                row.semester = profile.semester;
                row.cgpa = profile.cgpa;
                row.updated_at = now;
            }
            None => tables.students.push(StudentRow {
                id: Uuid::new_v4(),
                user_id,
                roll_no: profile.roll_no.clone(),
                name: profile.name.clone(),
                branch: profile.branch.clone(),
                joined_year: profile.joined_year,
                semester: profile.semester,
                cgpa: profile.cgpa,
                created_at: now,
                updated_at: now,
            }),
        }
        Ok(())
    }

    async fn list_skills(&self, student_id: Uuid) -> Result<Vec<SkillRow>, AppError> {
        self.check_reads("list_skills")?;
        Ok(self.skills_of(student_id))
    }

    async fn replace_skills(
        &self,
        student_id: Uuid,
        snapshot: &SkillSnapshot,
    ) -> Result<usize, AppError> {
        let mut tables = self.tables();
        let existing: Vec<_> = tables
            .skills
            .iter()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect();
        let changes = plan_skill_changes(&existing, snapshot);

        // Work on a copy so a failure leaves the committed rows untouched.
        let mut staged = tables.skills.clone();
        for (applied, change) in changes.iter().enumerate() {
            if applied > 0 && self.fail_skill_writes.load(Ordering::SeqCst) {
                return Err(injected("replace_skills"));
            }
            match change {
                SkillChange::Insert(skill) | SkillChange::Update(skill) => {
                    apply_write(&mut staged, student_id, skill)
                }
                SkillChange::Delete(name) => {
                    staged.retain(|r| !(r.student_id == student_id && &r.skill_name == name))
                }
            }
        }
        if self.fail_skill_writes.load(Ordering::SeqCst) {
            return Err(injected("replace_skills"));
        }
        tables.skills = staged;
        Ok(changes.len())
    }

    async fn upsert_skill(&self, student_id: Uuid, skill: &SkillWrite) -> Result<(), AppError> {
        if self.fail_skill_writes.load(Ordering::SeqCst) {
            return Err(injected("upsert_skill"));
        }
        apply_write(&mut self.tables().skills, student_id, skill);
        Ok(())
    }

    async fn upsert_resume_skills(
        &self,
        student_id: Uuid,
        detected: &[String],
        missing: &[String],
    ) -> Result<Uuid, AppError> {
        if self.fail_resume_writes.load(Ordering::SeqCst) {
            return Err(injected("upsert_resume_skills"));
        }
        let now = Utc::now();
        let mut tables = self.tables();
        let latest = tables
            .resumes
            .iter()
            .enumerate()
            .filter(|(_, (owner, _))| *owner == student_id)
            .max_by_key(|(_, (_, resume))| resume.uploaded_at)
            .map(|(index, _)| index);

        let index = match latest {
            Some(index) => index,
            None => {
                tables.resumes.push((
                    student_id,
                    ResumeInsights {
                        resume_id: Uuid::new_v4(),
                        file_url: None,
                        file_name: Some(SELF_REPORTED_FILE_NAME.to_string()),
                        uploaded_at: now,
                        analysis: None,
                    },
                ));
                tables.resumes.len() - 1
            }
        };
        let resume = &mut tables.resumes[index].1;

        match resume.analysis.as_mut() {
            Some(analysis) => {
                analysis.detected_skills = detected.to_vec();
                analysis.missing_skills = missing.to_vec();
                analysis.analyzed_at = now;
            }
            None => {
                resume.analysis = Some(ResumeAnalysis {
                    overall_score: 0,
                    detected_skills: detected.to_vec(),
                    missing_skills: missing.to_vec(),
                    suggestions: Vec::new(),
                    analyzed_at: now,
                })
            }
        }
        Ok(resume.resume_id)
    }

    async fn list_placements(&self, student_id: Uuid) -> Result<Vec<PlacementRow>, AppError> {
        self.check_reads("list_placements")?;
        let mut rows: Vec<_> = self
            .tables()
            .placements
            .iter()
            .filter(|p| p.student_id == student_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
        Ok(rows)
    }

    async fn activity_summaries(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<ActivitySummaryRow>, AppError> {
        self.check_reads("activity_summaries")?;
        Ok(self
            .tables()
            .summaries
            .iter()
            .filter(|(owner, _)| *owner == student_id)
            .map(|(_, summary)| summary.clone())
            .collect())
    }

    async fn activity_heatmap(
        &self,
        student_id: Uuid,
        platform: Platform,
    ) -> Result<Vec<HeatmapDay>, AppError> {
        self.check_reads("activity_heatmap")?;
        let mut days: Vec<_> = self
            .tables()
            .days
            .iter()
            .filter(|(owner, p, _)| *owner == student_id && *p == platform)
            .map(|(_, _, day)| day.clone())
            .collect();
        days.sort_by_key(|d| d.date);
        Ok(days)
    }

    async fn latest_resume(&self, student_id: Uuid) -> Result<Option<ResumeInsights>, AppError> {
        self.check_reads("latest_resume")?;
        Ok(self
            .tables()
            .resumes
            .iter()
            .filter(|(owner, _)| *owner == student_id)
            .map(|(_, resume)| resume)
            .max_by_key(|resume| resume.uploaded_at)
            .cloned())
    }

    async fn training_for_skills(
        &self,
        skills: &[String],
    ) -> Result<Vec<TrainingProgram>, AppError> {
        self.check_reads("training_for_skills")?;
        self.training_queries.fetch_add(1, Ordering::SeqCst);
        let mut programs: Vec<_> = self
            .tables()
            .programs
            .iter()
            .filter(|p| p.covers_any(skills))
            .cloned()
            .collect();
        sort_by_difficulty(&mut programs);
        Ok(programs)
    }

    async fn count_students(&self) -> Result<i64, AppError> {
        self.check_reads("count_students")?;
        Ok(self.tables().students.len() as i64)
    }

    async fn skill_demand(&self) -> Result<Vec<SkillDemandRow>, AppError> {
        self.check_reads("skill_demand")?;
        let mut demand: Vec<SkillDemandRow> = Vec::new();
        for row in &self.tables().skills {
            let index = match demand.iter().position(|d| d.skill_name == row.skill_name) {
                Some(index) => index,
                None => {
                    demand.push(SkillDemandRow {
                        skill_name: row.skill_name.clone(),
                        current_count: 0,
                        learning_count: 0,
                    });
                    demand.len() - 1
                }
            };
            if row.is_current {
                demand[index].current_count += 1;
            } else {
                demand[index].learning_count += 1;
            }
        }
        Ok(demand)
    }
}
