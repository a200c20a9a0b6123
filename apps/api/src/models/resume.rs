use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::json_columns::{decode_string_list, decode_value_list};

/// File name given to the placeholder resume that anchors self-reported skills.
pub const SELF_REPORTED_FILE_NAME: &str = "Self-reported skills";

/// Latest resume joined with its (optional) analysis, as stored.
/// JSON columns may hold either arrays or JSON-encoded text.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeInsightsRow {
    pub resume_id: Uuid,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub overall_score: Option<i32>,
    pub detected_skills: Option<Value>,
    pub missing_skills: Option<Value>,
    pub suggestions: Option<Value>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeAnalysis {
    pub overall_score: i32,
    pub detected_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<Value>,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeInsights {
    pub resume_id: Uuid,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub analysis: Option<ResumeAnalysis>,
}

impl ResumeInsights {
    /// A real upload has a file URL; the self-reported placeholder does not.
    pub fn has_uploaded_file(&self) -> bool {
        self.file_url.is_some()
    }

    pub fn overall_score(&self) -> i32 {
        self.analysis.as_ref().map(|a| a.overall_score).unwrap_or(0)
    }

    pub fn detected_skills(&self) -> &[String] {
        self.analysis
            .as_ref()
            .map(|a| a.detected_skills.as_slice())
            .unwrap_or(&[])
    }

    pub fn missing_skills(&self) -> &[String] {
        self.analysis
            .as_ref()
            .map(|a| a.missing_skills.as_slice())
            .unwrap_or(&[])
    }
}

impl From<ResumeInsightsRow> for ResumeInsights {
    fn from(row: ResumeInsightsRow) -> Self {
        // analyzed_at is NOT NULL on resume_analysis, so it marks the joined row.
        let analysis = row.analyzed_at.map(|analyzed_at| ResumeAnalysis {
            overall_score: row.overall_score.unwrap_or(0),
            detected_skills: decode_string_list("detected_skills", row.detected_skills),
            missing_skills: decode_string_list("missing_skills", row.missing_skills),
            suggestions: decode_value_list("suggestions", row.suggestions),
            analyzed_at,
        });

        Self {
            resume_id: row.resume_id,
            file_url: row.file_url,
            file_name: row.file_name,
            uploaded_at: row.uploaded_at,
            analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(analyzed: bool) -> ResumeInsightsRow {
        ResumeInsightsRow {
            resume_id: Uuid::new_v4(),
            file_url: None,
            file_name: Some(SELF_REPORTED_FILE_NAME.to_string()),
            uploaded_at: Utc::now(),
            overall_score: analyzed.then_some(72),
            detected_skills: analyzed.then(|| json!("[\"Python\",\"SQL\"]")),
            missing_skills: analyzed.then(|| json!(["AWS"])),
            suggestions: None,
            analyzed_at: analyzed.then(Utc::now),
        }
    }

    #[test]
    fn test_analysis_decodes_both_column_shapes() {
        let insights = ResumeInsights::from(row(true));
        assert_eq!(insights.overall_score(), 72);
        assert_eq!(insights.detected_skills(), ["Python", "SQL"]);
        assert_eq!(insights.missing_skills(), ["AWS"]);
        assert!(insights.analysis.unwrap().suggestions.is_empty());
    }

    #[test]
    fn test_resume_without_analysis() {
        let insights = ResumeInsights::from(row(false));
        assert!(insights.analysis.is_none());
        assert_eq!(insights.overall_score(), 0);
        assert!(insights.missing_skills().is_empty());
        assert!(!insights.has_uploaded_file());
    }
}
