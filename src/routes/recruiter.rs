//! Recruiter and admin surface. Every job and application is scoped to the caller's own jobs.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::routes::ApiJson;
use crate::schemas::{ApplicationMove, JobCreate, JobUpdate, NoteCreate};
use crate::security::RecruiterUser;
use crate::services::views::{ApplicationRead, JobRead, RecruiterJobDetail};
use crate::services::{catalog, notes, pipeline};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/recruiter/jobs",
    tag = "recruiter",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Jobs created by the caller, newest first", body = Vec<JobRead>),
        (status = 403, description = "Not a recruiter")
    )
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
) -> AppResult<Json<Vec<JobRead>>> {
    Ok(Json(catalog::list_owned_jobs(&state.db, user.id).await?))
}

#[utoipa::path(
    post,
    path = "/recruiter/jobs",
    tag = "recruiter",
    security(("bearer" = [])),
    request_body = JobCreate,
    responses(
        (status = 201, description = "Job created with its stages", body = JobRead),
        (status = 400, description = "Invalid salary or stage names"),
        (status = 403, description = "Not a recruiter")
    )
)]
pub async fn create_job(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    ApiJson(payload): ApiJson<JobCreate>,
) -> AppResult<(StatusCode, Json<JobRead>)> {
    let job = catalog::create_job(&state.db, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/recruiter/jobs/{job_id}",
    tag = "recruiter",
    security(("bearer" = [])),
    params(("job_id" = i32, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job with all of its applications", body = RecruiterJobDetail),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
#[tracing::instrument(skip(state, user), fields(recruiter_id = user.id))]
pub async fn job_detail(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(job_id): Path<i32>,
) -> AppResult<Json<RecruiterJobDetail>> {
    Ok(Json(pipeline::list_for_job_owner(&state.db, &user, job_id).await?))
}

/// Supplying `stage_names` replaces the whole pipeline.
#[utoipa::path(
    patch,
    path = "/recruiter/jobs/{job_id}",
    tag = "recruiter",
    security(("bearer" = [])),
    params(("job_id" = i32, Path, description = "Job id")),
    request_body = JobUpdate,
    responses(
        (status = 200, description = "Updated job", body = JobRead),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn update_job(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(job_id): Path<i32>,
    ApiJson(payload): ApiJson<JobUpdate>,
) -> AppResult<Json<JobRead>> {
    Ok(Json(catalog::update_job(&state.db, &user, job_id, payload).await?))
}

#[utoipa::path(
    post,
    path = "/recruiter/applications/{application_id}/move",
    tag = "recruiter",
    security(("bearer" = [])),
    params(("application_id" = i32, Path, description = "Application id")),
    request_body = ApplicationMove,
    responses(
        (status = 200, description = "Application in its new stage", body = ApplicationRead),
        (status = 400, description = "Stage does not belong to the job"),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn move_application(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(application_id): Path<i32>,
    ApiJson(payload): ApiJson<ApplicationMove>,
) -> AppResult<Json<ApplicationRead>> {
    let application = pipeline::move_application(&state.db, &user, application_id, payload.stage_id).await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/recruiter/applications/{application_id}/notes",
    tag = "recruiter",
    security(("bearer" = [])),
    params(("application_id" = i32, Path, description = "Application id")),
    request_body = NoteCreate,
    responses(
        (status = 200, description = "Application with the full note history", body = ApplicationRead),
        (status = 400, description = "Empty note"),
        (status = 404, description = "Missing or owned by someone else")
    )
)]
pub async fn add_note(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(application_id): Path<i32>,
    ApiJson(payload): ApiJson<NoteCreate>,
) -> AppResult<Json<ApplicationRead>> {
    Ok(Json(notes::add_note(&state.db, &user, application_id, payload.body).await?))
}
