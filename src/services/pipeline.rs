//! Applications moving through a job's stage pipeline.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::db::retry_on_contention;
use crate::entities::application::STATUS_ACTIVE;
use crate::entities::job_stage::FALLBACK_STAGE_NAME;
use crate::entities::{application, job, job_stage, user};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::services::catalog;
use crate::services::storage::ResumeStorage;
use crate::services::views::{
    compose_application, compose_applications, compose_job, ApplicationRead, Audience, RecruiterJobDetail, StageOrder,
};

/// A resume file received with an application.
#[derive(Debug)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct NewApplication {
    pub job_id: i32,
    pub cover_letter: Option<String>,
    pub resume: Option<ResumeUpload>,
}

fn application_not_found() -> AppError {
    AppError::not_found("Application not found")
}

/// The candidate's own applications, newest first, without recruiter notes.
pub async fn list_for_candidate<C: ConnectionTrait>(db: &C, candidate_id: i32) -> AppResult<Vec<ApplicationRead>> {
    let applications = application::Entity::find()
        .filter(application::Column::CandidateId.eq(candidate_id))
        .order_by_desc(application::Column::CreatedAt)
        .order_by_desc(application::Column::Id)
        .all(db)
        .await?;
    compose_applications(db, applications, Audience::Candidate).await
}

/// First stage of the job by position. A job without stages gets a fallback stage.
async fn entry_stage<C: ConnectionTrait>(db: &C, job_id: i32) -> AppResult<job_stage::Model> {
    let first = job_stage::Entity::find()
        .filter(job_stage::Column::JobId.eq(job_id))
        .order_by_asc(job_stage::Column::Position)
        .order_by_asc(job_stage::Column::Id)
        .one(db)
        .await?;
    if let Some(stage) = first {
        return Ok(stage);
    }

    let stage = job_stage::ActiveModel {
        job_id: Set(job_id),
        name: Set(FALLBACK_STAGE_NAME.to_string()),
        position: Set(1),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(job_id, stage_id = stage.id, "Synthesized entry stage for job without stages");
    Ok(stage)
}

#[tracing::instrument(skip(db, storage, candidate, request), fields(candidate_id = candidate.id, job_id = request.job_id))]
pub async fn apply_to_job(
    db: &DatabaseConnection,
    storage: &ResumeStorage,
    candidate: &user::Model,
    request: NewApplication,
) -> AppResult<ApplicationRead> {
    let application = retry_on_contention(|| submit_application(db, storage, candidate, &request)).await?;
    info!(application_id = application.id, stage_id = ?application.stage_id, "Application submitted");
    compose_application(db, application, Audience::Candidate).await
}

/// One transactional attempt at inserting the application.
async fn submit_application(
    db: &DatabaseConnection,
    storage: &ResumeStorage,
    candidate: &user::Model,
    request: &NewApplication,
) -> AppResult<application::Model> {
    let txn = db.begin().await?;

    let job = job::Entity::find_by_id(request.job_id)
        .one(&txn)
        .await?
        .filter(job::Model::is_open)
        .ok_or_else(|| AppError::not_found("Job not available"))?;

    let existing = application::Entity::find()
        .filter(application::Column::CandidateId.eq(candidate.id))
        .filter(application::Column::JobId.eq(job.id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(AppError::conflict("Already applied"));
    }

    let stage = entry_stage(&txn, job.id).await?;

    let resume_path = match &request.resume {
        Some(resume) => Some(
            storage
                .store(candidate.id, job.id, &resume.file_name, &resume.bytes)
                .await?,
        ),
        None => None,
    };

    let now = Utc::now();
    let inserted = application::ActiveModel {
        candidate_id: Set(candidate.id),
        job_id: Set(job.id),
        stage_id: Set(Some(stage.id)),
        status: Set(STATUS_ACTIVE.to_string()),
        resume_path: Set(resume_path),
        cover_letter: Set(request.cover_letter.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await;
    let application = match inserted {
        Ok(application) => application,
        Err(err) if is_unique_violation(&err) => return Err(AppError::conflict("Already applied")),
        Err(err) => return Err(err.into()),
    };
    txn.commit().await?;
    Ok(application)
}

/// Job with its stages plus recruiter views of every application to it, newest first.
pub async fn list_for_job_owner<C: ConnectionTrait>(
    db: &C,
    recruiter: &user::Model,
    job_id: i32,
) -> AppResult<RecruiterJobDetail> {
    let job = catalog::find_owned_job(db, recruiter.id, job_id).await?;
    let applications = application::Entity::find()
        .filter(application::Column::JobId.eq(job.id))
        .order_by_desc(application::Column::CreatedAt)
        .order_by_desc(application::Column::Id)
        .all(db)
        .await?;

    Ok(RecruiterJobDetail {
        job: compose_job(db, job, StageOrder::ByPosition).await?,
        applications: compose_applications(db, applications, Audience::Recruiter).await?,
    })
}

/// Applications to jobs the recruiter did not create are reported as missing.
pub async fn find_owned_application<C: ConnectionTrait>(
    db: &C,
    recruiter_id: i32,
    application_id: i32,
) -> AppResult<(application::Model, job::Model)> {
    let (application, job) = application::Entity::find_by_id(application_id)
        .find_also_related(job::Entity)
        .one(db)
        .await?
        .ok_or_else(application_not_found)?;
    match job {
        Some(job) if job.is_owned_by(recruiter_id) => Ok((application, job)),
        _ => Err(application_not_found()),
    }
}

#[tracing::instrument(skip(db, recruiter), fields(recruiter_id = recruiter.id))]
pub async fn move_application(
    db: &DatabaseConnection,
    recruiter: &user::Model,
    application_id: i32,
    stage_id: i32,
) -> AppResult<ApplicationRead> {
    let txn = db.begin().await?;
    let (application, job) = find_owned_application(&txn, recruiter.id, application_id).await?;

    let stage = job_stage::Entity::find_by_id(stage_id)
        .one(&txn)
        .await?
        .filter(|stage| stage.job_id == job.id)
        .ok_or_else(|| AppError::validation("Invalid stage"))?;

    let from_stage = application.stage_id;
    let mut active: application::ActiveModel = application.into();
    active.stage_id = Set(Some(stage.id));
    active.updated_at = Set(Utc::now());
    let application = active.update(&txn).await?;
    txn.commit().await?;

    info!(application_id, ?from_stage, to_stage = stage.id, "Application moved");
    compose_application(db, application, Audience::Recruiter).await
}
