//! Wire shapes for `GET /api/student/dashboard`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::activity::{ActivitySummaryRow, HeatmapDay};
use crate::models::placement::PlacementRow;
use crate::models::resume::ResumeInsights;
use crate::models::training::TrainingProgram;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkillProgress {
    pub name: String,
    pub progress: i32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeetcodeData {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_problems: i32,
    pub heatmap: Vec<HeatmapDay>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GithubData {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_contributions: i32,
    pub heatmap: Vec<HeatmapDay>,
}

impl LeetcodeData {
    pub fn new(stats: &ActivitySummaryRow, heatmap: Vec<HeatmapDay>) -> Self {
        Self {
            current_streak: stats.current_streak,
            longest_streak: stats.longest_streak,
            total_problems: stats.total_count,
            heatmap,
        }
    }
}

impl GithubData {
    pub fn new(stats: &ActivitySummaryRow, heatmap: Vec<HeatmapDay>) -> Self {
        Self {
            current_streak: stats.current_streak,
            longest_streak: stats.longest_streak,
            total_contributions: stats.total_count,
            heatmap,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeInsightsView {
    pub overall_score: i32,
    pub detected_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<Value>,
    pub file_name: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&ResumeInsights> for ResumeInsightsView {
    fn from(resume: &ResumeInsights) -> Self {
        Self {
            overall_score: resume.overall_score(),
            detected_skills: resume.detected_skills().to_vec(),
            missing_skills: resume.missing_skills().to_vec(),
            suggestions: resume
                .analysis
                .as_ref()
                .map(|a| a.suggestions.clone())
                .unwrap_or_default(),
            file_name: resume.file_name.clone(),
            uploaded_at: resume.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementView {
    pub id: Uuid,
    pub company_name: Option<String>,
    pub role_offered: Option<String>,
    pub package_lpa: Option<f64>,
    pub status: String,
    pub applied_date: Option<NaiveDate>,
    pub result_date: Option<NaiveDate>,
}

impl From<PlacementRow> for PlacementView {
    fn from(row: PlacementRow) -> Self {
        Self {
            id: row.id,
            company_name: row.company_name,
            role_offered: row.role_offered,
            package_lpa: row.package_lpa,
            status: row.status,
            applied_date: row.applied_date,
            result_date: row.result_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub name: String,
    pub branch: String,
    pub semester: i32,
    pub cgpa: Option<f64>,
    pub roll_no: String,
    pub placement_readiness: i32,
    pub skill_coverage: u32,
    pub leetcode_streak: i32,
    pub github_streak: i32,
    pub current_skills: Vec<String>,
    pub skills_to_learn: Vec<String>,
    /// Progress of the skills still being learned.
    pub skill_progress: Vec<SkillProgress>,
    pub leetcode_data: LeetcodeData,
    pub github_data: GithubData,
    pub resume_insights: Option<ResumeInsightsView>,
    pub placements: Vec<PlacementView>,
    pub training_programs: Vec<TrainingProgram>,
}
