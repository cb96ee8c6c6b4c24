use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::services::catalog;
use crate::services::views::JobRead;
use crate::state::AppState;

/// Open jobs, newest first.
#[utoipa::path(
    get,
    path = "/jobs",
    tag = "jobs",
    responses((status = 200, description = "Open jobs", body = Vec<JobRead>))
)]
pub async fn list_jobs(State(state): State<AppState>) -> AppResult<Json<Vec<JobRead>>> {
    Ok(Json(catalog::list_open_jobs(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/jobs/{job_id}",
    tag = "jobs",
    params(("job_id" = i32, Path, description = "Job id")),
    responses(
        (status = 200, description = "Open job", body = JobRead),
        (status = 404, description = "Missing or not open")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn job_detail(State(state): State<AppState>, Path(job_id): Path<i32>) -> AppResult<Json<JobRead>> {
    Ok(Json(catalog::get_open_job(&state.db, job_id).await?))
}
