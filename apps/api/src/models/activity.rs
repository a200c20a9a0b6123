use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Leetcode,
    Github,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Leetcode => "leetcode",
            Platform::Github => "github",
        }
    }
}

/// Aggregated counters from the summary rows (`activity_date IS NULL`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ActivitySummaryRow {
    pub platform: String,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_count: i32,
}

/// One day of activity used by the heatmaps.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub count: i32,
}
