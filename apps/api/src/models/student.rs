use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub roll_no: String,
    pub name: String,
    pub branch: String,
    pub joined_year: i32,
    pub semester: i32,
    pub cgpa: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated profile fields ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileInput {
    pub roll_no: String,
    pub name: String,
    pub branch: String,
    pub joined_year: i32,
    pub semester: i32,
    pub cgpa: Option<f64>,
}

/// Profile as the client sees it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub roll_no: String,
    pub name: String,
    pub branch: String,
    pub joined_year: i32,
    pub semester: i32,
    pub cgpa: Option<f64>,
}

impl From<&StudentRow> for ProfileView {
    fn from(row: &StudentRow) -> Self {
        Self {
            roll_no: row.roll_no.clone(),
            name: row.name.clone(),
            branch: row.branch.clone(),
            joined_year: row.joined_year,
            semester: row.semester,
            cgpa: row.cgpa,
        }
    }
}
