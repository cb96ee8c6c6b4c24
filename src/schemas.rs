//! Request payloads accepted by the API.

use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

use crate::entities::job::{DEFAULT_EMPLOYMENT_TYPE, STATUS_OPEN};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    /// One of `candidate`, `recruiter`, `admin`. Defaults to `candidate`.
    pub role: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update. Omitted fields are left alone, `null` clears a field.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfileUpdate {
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub full_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
}

fn default_employment_type() -> String {
    DEFAULT_EMPLOYMENT_TYPE.to_string()
}

fn default_status() -> String {
    STATUS_OPEN.to_string()
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct JobCreate {
    pub title: String,
    pub company: String,
    pub location: String,
    pub department: Option<String>,
    #[serde(default = "default_employment_type")]
    pub employment_type: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub description: String,
    pub requirements: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    /// Pipeline stage names in order. Omitted or empty means the default pipeline.
    pub stage_names: Option<Vec<String>>,
}

/// Partial job update. Supplying `stage_names` replaces the whole pipeline.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub department: Option<Option<String>>,
    pub employment_type: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub requirements: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<f64>)]
    pub min_salary: Option<Option<f64>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<f64>)]
    pub max_salary: Option<Option<f64>>,
    pub stage_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApplicationMove {
    pub stage_id: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NoteCreate {
    pub body: String,
}

/// Multipart form for `POST /candidate/applications` (documentation only).
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ApplicationForm {
    pub job_id: i32,
    pub cover_letter: Option<String>,
    #[schema(format = Binary, value_type = Option<String>)]
    pub resume: Option<Vec<u8>>,
}

/// Multipart form for `POST /candidate/resume/autofill` (documentation only).
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ResumeForm {
    #[schema(format = Binary, value_type = String)]
    pub resume: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_update_tells_null_from_absent() {
        let update: JobUpdate =
            serde_json::from_str(r#"{"department": null, "title": "Staff Engineer"}"#).unwrap();

        assert_eq!(update.department, Some(None));
        assert_eq!(update.requirements, None);
        assert_eq!(update.title.as_deref(), Some("Staff Engineer"));
        assert!(update.stage_names.is_none());
    }

    #[test]
    fn job_create_applies_defaults() {
        let job: JobCreate = serde_json::from_str(
            r#"{"title": "t", "company": "c", "location": "l", "description": "d"}"#,
        )
        .unwrap();

        assert_eq!(job.employment_type, "Full-time");
        assert_eq!(job.status, "open");
        assert!(job.stage_names.is_none());
    }

    #[test]
    fn profile_update_sets_and_clears() {
        let update: ProfileUpdate =
            serde_json::from_str(r#"{"phone": "555-0100", "bio": null}"#).unwrap();

        assert_eq!(update.phone, Some(Some("555-0100".to_string())));
        assert_eq!(update.bio, Some(None));
        assert_eq!(update.full_name, None);
    }
}
