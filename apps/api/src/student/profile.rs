use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::student::{ProfileInput, ProfileView, StudentRow};
use crate::skills::views::SkillGroups;
use crate::store::StudentStore;

/// Profile form as submitted. Required fields are optional here so a missing
/// field becomes a validation error rather than a body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub roll_no: Option<String>,
    pub name: Option<String>,
    pub branch: Option<String>,
    pub joined_year: Option<i32>,
    pub semester: Option<i32>,
    pub cgpa: Option<f64>,
}

impl ProfileRequest {
    pub fn validate(self) -> Result<ProfileInput, AppError> {
        let required = "rollNo, name, branch, joinedYear, semester are required";
        let text = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::Validation(required.to_string()))
        };

        let roll_no = text(self.roll_no)?;
        let name = text(self.name)?;
        let branch = text(self.branch)?;
        let joined_year = self
            .joined_year
            .ok_or_else(|| AppError::Validation(required.to_string()))?;
        let semester = self
            .semester
            .ok_or_else(|| AppError::Validation(required.to_string()))?;

        if !(1950..=2100).contains(&joined_year) {
            return Err(AppError::Validation(format!(
                "joinedYear {joined_year} is out of range"
            )));
        }
        if !(1..=12).contains(&semester) {
            return Err(AppError::Validation(format!(
                "semester must be between 1 and 12, got {semester}"
            )));
        }
        if let Some(cgpa) = self.cgpa {
            if !(0.0..=10.0).contains(&cgpa) {
                return Err(AppError::Validation(format!(
                    "cgpa must be between 0 and 10, got {cgpa}"
                )));
            }
        }

        Ok(ProfileInput {
            roll_no,
            name,
            branch,
            joined_year,
            semester,
            cgpa: self.cgpa,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile: ProfileView,
    #[serde(flatten)]
    pub skills: SkillGroups,
}

#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub message: String,
    pub profile: ProfileView,
}

/// Maps the caller to their student row. A user without one gets `NotFound`.
pub async fn resolve_student(
    store: &dyn StudentStore,
    user: &AuthUser,
) -> Result<StudentRow, AppError> {
    store
        .find_student_by_user(user.user_id)
        .await?
        .ok_or_else(AppError::profile_missing)
}

pub async fn get_profile(
    store: &dyn StudentStore,
    user: &AuthUser,
) -> Result<ProfileResponse, AppError> {
    let student = resolve_student(store, user).await?;
    let rows = store.list_skills(student.id).await?;
    Ok(ProfileResponse {
        profile: ProfileView::from(&student),
        skills: SkillGroups::from_rows(&rows),
    })
}

/// Writes the profile, then answers with the row as re-read from storage.
pub async fn save_profile(
    store: &dyn StudentStore,
    user: &AuthUser,
    request: ProfileRequest,
) -> Result<SaveProfileResponse, AppError> {
    let input = request.validate()?;
    store.upsert_profile(user.user_id, &input).await?;

    let saved = store.find_student_by_user(user.user_id).await?.ok_or_else(|| {
        AppError::Internal(anyhow!(
            "profile for user {} missing after commit",
            user.user_id
        ))
    })?;
    info!("Saved profile for user {} (student {})", user.user_id, saved.id);

    Ok(SaveProfileResponse {
        message: "Profile saved".to_string(),
        profile: ProfileView::from(&saved),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::skills::reconcile::SkillWrite;
    use crate::store::memory::MemoryStore;
    use uuid::Uuid;

    fn student_user() -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Student,
        }
    }

    fn request() -> ProfileRequest {
        ProfileRequest {
            roll_no: Some("CS2022042".to_string()),
            name: Some("Priya Sharma".to_string()),
            branch: Some("Information Technology".to_string()),
            joined_year: Some(2022),
            semester: Some(4),
            cgpa: Some(9.1),
        }
    }

    #[test]
    fn test_missing_required_field_is_invalid() {
        let req = ProfileRequest {
            branch: None,
            ..request()
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        let req = ProfileRequest {
            name: Some("   ".to_string()),
            ..request()
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_range_checks() {
        for req in [
            ProfileRequest {
                semester: Some(0),
                ..request()
            },
            ProfileRequest {
                joined_year: Some(1800),
                ..request()
            },
            ProfileRequest {
                cgpa: Some(10.5),
                ..request()
            },
        ] {
            assert!(matches!(req.validate(), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_cgpa_is_optional() {
        let input = ProfileRequest { cgpa: None, ..request() }.validate().unwrap();
        assert_eq!(input.cgpa, None);
        assert_eq!(input.name, "Priya Sharma");
    }

    #[tokio::test]
    async fn test_first_save_creates_profile() {
        let store = MemoryStore::new();
        let user = student_user();

        let saved = save_profile(&store, &user, request()).await.unwrap();
        assert_eq!(saved.profile.roll_no, "CS2022042");
        assert_eq!(saved.profile.cgpa, Some(9.1));
        assert!(store.find_student_by_user(user.user_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_second_save_updates_in_place() {
        let store = MemoryStore::new();
        let user = student_user();
        save_profile(&store, &user, request()).await.unwrap();
        let first = store.find_student_by_user(user.user_id).await.unwrap().unwrap();

        let saved = save_profile(
            &store,
            &user,
            ProfileRequest {
                semester: Some(5),
                ..request()
            },
        )
        .await
        .unwrap();
        let second = store.find_student_by_user(user.user_id).await.unwrap().unwrap();

        assert_eq!(saved.profile.semester, 5);
        assert_eq!(first.id, second.id);
        assert_eq!(store.count_students().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_profile_writes_nothing() {
        let store = MemoryStore::new();
        let user = student_user();
        let result = save_profile(&store, &user, ProfileRequest::default()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.count_students().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_profile_without_student_is_not_found() {
        let store = MemoryStore::new();
        let result = get_profile(&store, &student_user()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_profile_includes_skills() {
        let store = MemoryStore::new();
        let user = student_user();
        let student = store.seed_student(user.user_id, "Alex Johnson");
        store.seed_skill(student.id, SkillWrite::current("Python", 80));
        store.seed_skill(student.id, SkillWrite::learning("Docker"));

        let response = get_profile(&store, &user).await.unwrap();
        assert_eq!(response.profile.name, "Alex Johnson");
        assert_eq!(response.skills.current_skills[0].name, "Python");
        assert_eq!(response.skills.learning_skills[0].name, "Docker");
    }
}
