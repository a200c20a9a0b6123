use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlacementRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub company_name: Option<String>,
    pub role_offered: Option<String>,
    pub package_lpa: Option<f64>,
    /// applied | shortlisted | interviewed | offered | accepted | rejected
    pub status: String,
    pub applied_date: Option<NaiveDate>,
    pub result_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
