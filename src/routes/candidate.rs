use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::routes::ApiJson;
use crate::schemas::{ApplicationForm, ProfileUpdate, ResumeForm};
use crate::security::CandidateUser;
use crate::services::identity;
use crate::services::pipeline::{self, NewApplication, ResumeUpload};
use crate::services::storage::DEFAULT_RESUME_NAME;
use crate::services::views::{ApplicationRead, UserRead};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/candidate/profile",
    tag = "candidate",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Own profile", body = UserRead),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not a candidate")
    )
)]
pub async fn get_profile(CandidateUser(user): CandidateUser) -> Json<UserRead> {
    Json(UserRead::from(&user))
}

/// Only fields present in the body change; `null` clears a field.
#[utoipa::path(
    patch,
    path = "/candidate/profile",
    tag = "candidate",
    security(("bearer" = [])),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Updated profile", body = UserRead),
        (status = 403, description = "Not a candidate")
    )
)]
#[tracing::instrument(skip_all, fields(user_id = user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    ApiJson(payload): ApiJson<ProfileUpdate>,
) -> AppResult<Json<UserRead>> {
    let user = identity::update_profile(&state.db, user, payload).await?;
    Ok(Json(UserRead::from(&user)))
}

#[utoipa::path(
    get,
    path = "/candidate/applications",
    tag = "candidate",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Own applications, newest first", body = Vec<ApplicationRead>),
        (status = 403, description = "Not a candidate")
    )
)]
pub async fn list_applications(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
) -> AppResult<Json<Vec<ApplicationRead>>> {
    Ok(Json(pipeline::list_for_candidate(&state.db, user.id).await?))
}

/// A file part with no name and no content counts as no file.
fn uploaded_file(file_name: Option<String>, bytes: Vec<u8>) -> Option<ResumeUpload> {
    let file_name = file_name.filter(|name| !name.trim().is_empty());
    if file_name.is_none() && bytes.is_empty() {
        return None;
    }
    Some(ResumeUpload {
        file_name: file_name.unwrap_or_else(|| DEFAULT_RESUME_NAME.to_string()),
        bytes,
    })
}

fn text_field(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[utoipa::path(
    post,
    path = "/candidate/applications",
    tag = "candidate",
    security(("bearer" = [])),
    request_body(content = ApplicationForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Application submitted", body = ApplicationRead),
        (status = 400, description = "Malformed form"),
        (status = 404, description = "Job missing or not open"),
        (status = 409, description = "Already applied")
    )
)]
#[tracing::instrument(skip_all, fields(candidate_id = user.id))]
pub async fn apply(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApplicationRead>> {
    let mut job_id = None;
    let mut cover_letter = None;
    let mut resume = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "job_id" => {
                let raw = field.text().await?;
                let parsed = raw
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| AppError::validation("job_id must be an integer"))?;
                job_id = Some(parsed);
            }
            "cover_letter" => cover_letter = text_field(field.text().await?),
            "resume" => {
                let file_name = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await?.to_vec();
                resume = uploaded_file(file_name, bytes);
            }
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    let job_id = job_id.ok_or_else(|| AppError::validation("job_id is required"))?;
    let application = pipeline::apply_to_job(
        &state.db,
        &state.storage,
        &user,
        NewApplication {
            job_id,
            cover_letter,
            resume,
        },
    )
    .await?;
    Ok(Json(application))
}

/// Forwards the resume to the external parser and returns its JSON unchanged.
#[utoipa::path(
    post,
    path = "/candidate/resume/autofill",
    tag = "candidate",
    security(("bearer" = [])),
    request_body(content = ResumeForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Parser output", body = serde_json::Value),
        (status = 400, description = "No resume file"),
        (status = 502, description = "Parser unreachable"),
        (status = 503, description = "Parser not configured"),
        (status = 504, description = "Parser timed out")
    )
)]
#[tracing::instrument(skip_all, fields(candidate_id = user.id))]
pub async fn autofill_resume(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("resume") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_owned();
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await?.to_vec();
        upload = Some((file_name, content_type, bytes));
    }

    let (file_name, content_type, bytes) =
        upload.ok_or_else(|| AppError::validation("resume file is required"))?;
    let parsed = state
        .resume_parser
        .parse(&file_name, content_type.as_deref(), bytes)
        .await?;
    Ok(Json(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_part_is_treated_as_absent() {
        assert!(uploaded_file(None, Vec::new()).is_none());
        assert!(uploaded_file(Some("  ".into()), Vec::new()).is_none());
    }

    #[test]
    fn nameless_file_gets_default_name() {
        let upload = uploaded_file(None, b"%PDF".to_vec()).unwrap();
        assert_eq!(upload.file_name, DEFAULT_RESUME_NAME);
        assert_eq!(upload.bytes, b"%PDF");
    }
}
