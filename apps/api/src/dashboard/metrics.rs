//! Pure derivations over the dashboard reads.

use crate::models::activity::{ActivitySummaryRow, Platform};
use crate::models::resume::ResumeInsights;

/// Share of tracked skills already held, as a rounded percentage.
pub fn skill_coverage(current: usize, learning: usize) -> u32 {
    let total = current + learning;
    if total == 0 {
        return 0;
    }
    (100.0 * current as f64 / total as f64).round() as u32
}

/// Headline readiness: the latest analysis score, 0 without one.
pub fn placement_readiness(resume: Option<&ResumeInsights>) -> i32 {
    resume.map(ResumeInsights::overall_score).unwrap_or(0)
}

/// Summary row for `platform`, zeroed when the student has none.
pub fn platform_stats(summaries: &[ActivitySummaryRow], platform: Platform) -> ActivitySummaryRow {
    summaries
        .iter()
        .find(|s| s.platform == platform.as_str())
        .cloned()
        .unwrap_or_else(|| ActivitySummaryRow {
            platform: platform.as_str().to_string(),
            ..Default::default()
        })
}
