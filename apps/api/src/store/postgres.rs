use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::activity::{ActivitySummaryRow, HeatmapDay, Platform};
use crate::models::placement::PlacementRow;
use crate::models::resume::{ResumeInsights, ResumeInsightsRow, SELF_REPORTED_FILE_NAME};
use crate::models::skill::{SkillDemandRow, SkillRow};
use crate::models::student::{ProfileInput, StudentRow};
use crate::models::training::{sort_by_difficulty, TrainingProgram, TrainingProgramRow};
use crate::skills::reconcile::{plan_skill_changes, SkillChange, SkillSnapshot, SkillWrite};
use crate::store::StudentStore;

/// `StudentStore` over the shared PostgreSQL pool.
#[derive(Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Commits on success, otherwise rolls back explicitly before reporting the
/// original error. The connection goes back to the pool on both paths.
async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    result: Result<T, sqlx::Error>,
    operation: &str,
) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                warn!("Rollback of {operation} failed: {rollback}");
            }
            Err(e.into())
        }
    }
}

async fn write_profile(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    profile: &ProfileInput,
) -> Result<(), sqlx::Error> {
    let updated = sqlx::query(
        r#"
        UPDATE students
        SET roll_no = $1, name = $2, branch = $3, joined_year = $4,
            semester = $5, cgpa = $6, updated_at = NOW()
        WHERE user_id = $7
        "#,
    )
    .bind(&profile.roll_no)
    .bind(&profile.name)
    .bind(&profile.branch)
    .bind(profile.joined_year)
    .bind(profile.semester)
    .bind(profile.cgpa)
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    if updated.rows_affected() == 0 {
        sqlx::query(
            r#"
            INSERT INTO students (user_id, roll_no, name, branch, joined_year, semester, cgpa)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user_id)
        .bind(&profile.roll_no)
        .bind(&profile.name)
        .bind(&profile.branch)
        .bind(profile.joined_year)
        .bind(profile.semester)
        .bind(profile.cgpa)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn apply_snapshot(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
    snapshot: &SkillSnapshot,
) -> Result<usize, sqlx::Error> {
    let existing =
        sqlx::query_as::<_, SkillRow>("SELECT * FROM student_skills WHERE student_id = $1")
            .bind(student_id)
            .fetch_all(&mut **tx)
            .await?;

    let changes = plan_skill_changes(&existing, snapshot);
    for change in &changes {
        apply_change(tx, student_id, change).await?;
    }
    Ok(changes.len())
}

async fn apply_change(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
    change: &SkillChange,
) -> Result<(), sqlx::Error> {
    match change {
        // A concurrent replace may have inserted the row since it was read.
        SkillChange::Insert(skill) => {
            sqlx::query(
                r#"
                INSERT INTO student_skills
                    (student_id, skill_name, proficiency_level, progress, is_current)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (student_id, skill_name) DO UPDATE
                SET proficiency_level = EXCLUDED.proficiency_level,
                    progress = EXCLUDED.progress,
                    is_current = EXCLUDED.is_current
                "#,
            )
            .bind(student_id)
            .bind(&skill.skill_name)
            .bind(skill.proficiency_level.as_str())
            .bind(skill.progress)
            .bind(skill.is_current)
            .execute(&mut **tx)
            .await?;
        }
        SkillChange::Update(skill) => {
            sqlx::query(
                r#"
                UPDATE student_skills
                SET proficiency_level = $1, progress = $2, is_current = $3
                WHERE student_id = $4 AND skill_name = $5
                "#,
            )
            .bind(skill.proficiency_level.as_str())
            .bind(skill.progress)
            .bind(skill.is_current)
            .bind(student_id)
            .bind(&skill.skill_name)
            .execute(&mut **tx)
            .await?;
        }
        SkillChange::Delete(skill_name) => {
            sqlx::query("DELETE FROM student_skills WHERE student_id = $1 AND skill_name = $2")
                .bind(student_id)
                .bind(skill_name)
                .execute(&mut **tx)
                .await?;
        }
    }
    Ok(())
}

async fn write_resume_skills(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
    detected: &[String],
    missing: &[String],
) -> Result<Uuid, sqlx::Error> {
    let latest: Option<Uuid> = sqlx::query_scalar(
        "SELECT id FROM student_resumes WHERE student_id = $1 ORDER BY uploaded_at DESC LIMIT 1",
    )
    .bind(student_id)
    .fetch_optional(&mut **tx)
    .await?;

    let resume_id = match latest {
        Some(id) => id,
        None => {
            sqlx::query_scalar(
                "INSERT INTO student_resumes (student_id, file_url, file_name) VALUES ($1, NULL, $2) RETURNING id",
            )
            .bind(student_id)
            .bind(SELF_REPORTED_FILE_NAME)
            .fetch_one(&mut **tx)
            .await?
        }
    };

    sqlx::query(
        r#"
        INSERT INTO resume_analysis
            (resume_id, overall_score, detected_skills, missing_skills, suggestions)
        VALUES ($1, 0, $2, $3, '[]'::jsonb)
        ON CONFLICT (resume_id) DO UPDATE
        SET detected_skills = EXCLUDED.detected_skills,
            missing_skills = EXCLUDED.missing_skills,
            analyzed_at = NOW()
        "#,
    )
    .bind(resume_id)
    .bind(json!(detected))
    .bind(json!(missing))
    .execute(&mut **tx)
    .await?;

    Ok(resume_id)
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn find_student_by_user(&self, user_id: Uuid) -> Result<Option<StudentRow>, AppError> {
        Ok(
            sqlx::query_as::<_, StudentRow>("SELECT * FROM students WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn upsert_profile(&self, user_id: Uuid, profile: &ProfileInput) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let result = write_profile(&mut tx, user_id, profile).await;
        finish(tx, result, "profile upsert").await
    }

    async fn list_skills(&self, student_id: Uuid) -> Result<Vec<SkillRow>, AppError> {
        Ok(sqlx::query_as::<_, SkillRow>(
            r#"
            SELECT * FROM student_skills
            WHERE student_id = $1
            ORDER BY is_current DESC, progress DESC, skill_name ASC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn replace_skills(
        &self,
        student_id: Uuid,
        snapshot: &SkillSnapshot,
    ) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;
        let result = apply_snapshot(&mut tx, student_id, snapshot).await;
        finish(tx, result, "skills replace").await
    }

    async fn upsert_skill(&self, student_id: Uuid, skill: &SkillWrite) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO student_skills
                (student_id, skill_name, proficiency_level, progress, is_current)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id, skill_name) DO UPDATE
            SET proficiency_level = EXCLUDED.proficiency_level,
                progress = EXCLUDED.progress,
                is_current = EXCLUDED.is_current
            "#,
        )
        .bind(student_id)
        .bind(&skill.skill_name)
        .bind(skill.proficiency_level.as_str())
        .bind(skill.progress)
        .bind(skill.is_current)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn upsert_resume_skills(
        &self,
        student_id: Uuid,
        detected: &[String],
        missing: &[String],
    ) -> Result<Uuid, AppError> {
        let mut tx = self.pool.begin().await?;
        let result = write_resume_skills(&mut tx, student_id, detected, missing).await;
        finish(tx, result, "resume skills upsert").await
    }

    async fn list_placements(&self, student_id: Uuid) -> Result<Vec<PlacementRow>, AppError> {
        Ok(sqlx::query_as::<_, PlacementRow>(
            "SELECT * FROM placements WHERE student_id = $1 ORDER BY applied_date DESC NULLS LAST",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn activity_summaries(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<ActivitySummaryRow>, AppError> {
        Ok(sqlx::query_as::<_, ActivitySummaryRow>(
            r#"
            SELECT platform,
                   MAX(current_streak) AS current_streak,
                   MAX(longest_streak) AS longest_streak,
                   MAX(total_count) AS total_count
            FROM student_activity
            WHERE student_id = $1 AND activity_date IS NULL
            GROUP BY platform
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn activity_heatmap(
        &self,
        student_id: Uuid,
        platform: Platform,
    ) -> Result<Vec<HeatmapDay>, AppError> {
        Ok(sqlx::query_as::<_, HeatmapDay>(
            r#"
            SELECT activity_date AS date, daily_count AS count
            FROM student_activity
            WHERE student_id = $1 AND platform = $2 AND activity_date IS NOT NULL
            ORDER BY activity_date ASC
            "#,
        )
        .bind(student_id)
        .bind(platform.as_str())
        .fetch_all(&self.pool)
        .await?)
    }

    async fn latest_resume(&self, student_id: Uuid) -> Result<Option<ResumeInsights>, AppError> {
        let row = sqlx::query_as::<_, ResumeInsightsRow>(
            r#"
            SELECT sr.id AS resume_id, sr.file_url, sr.file_name, sr.uploaded_at,
                   ra.overall_score, ra.detected_skills, ra.missing_skills,
                   ra.suggestions, ra.analyzed_at
            FROM student_resumes sr
            LEFT JOIN resume_analysis ra ON sr.id = ra.resume_id
            WHERE sr.student_id = $1
            ORDER BY sr.uploaded_at DESC
            LIMIT 1
            "#,
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ResumeInsights::from))
    }

    async fn training_for_skills(
        &self,
        skills: &[String],
    ) -> Result<Vec<TrainingProgram>, AppError> {
        if skills.is_empty() {
            return Ok(Vec::new());
        }
        // Text-encoded tag columns cannot be matched in SQL; they are fetched
        // and filtered after decoding.
        let rows = sqlx::query_as::<_, TrainingProgramRow>(
            r#"
            SELECT id, title, description, skill_tags, provider, duration_hours, difficulty, url
            FROM training_programs
            WHERE (jsonb_typeof(skill_tags) = 'array' AND skill_tags ?| $1)
               OR jsonb_typeof(skill_tags) = 'string'
            "#,
        )
        .bind(skills)
        .fetch_all(&self.pool)
        .await?;

        let mut programs: Vec<TrainingProgram> = rows
            .into_iter()
            .map(TrainingProgram::from)
            .filter(|p| p.covers_any(skills))
            .collect();
        sort_by_difficulty(&mut programs);
        Ok(programs)
    }

    async fn count_students(&self) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn skill_demand(&self) -> Result<Vec<SkillDemandRow>, AppError> {
        Ok(sqlx::query_as::<_, SkillDemandRow>(
            r#"
            SELECT skill_name,
                   COUNT(*) FILTER (WHERE is_current) AS current_count,
                   COUNT(*) FILTER (WHERE NOT is_current) AS learning_count
            FROM student_skills
            GROUP BY skill_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
