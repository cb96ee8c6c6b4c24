//! Job catalog: postings and their stage pipelines. Only the creating recruiter may mutate a job.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::job::STATUS_OPEN;
use crate::entities::job_stage::DEFAULT_STAGE_NAMES;
use crate::entities::{application, job, job_stage, user};
use crate::error::{AppError, AppResult};
use crate::schemas::{JobCreate, JobUpdate};
use crate::services::views::{compose_job, compose_jobs, JobRead, StageOrder};

fn job_not_found() -> AppError {
    AppError::not_found("Job not found")
}

fn validate_salary(label: &str, value: Option<f64>) -> AppResult<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(AppError::validation(format!("{label} must be a non-negative number")))
        }
        _ => Ok(()),
    }
}

/// Trims names and rejects blank ones. Order is the pipeline order.
fn normalize_stage_names(names: Vec<String>) -> AppResult<Vec<String>> {
    names
        .into_iter()
        .map(|name| {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                Err(AppError::validation("stage names must not be blank"))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

/// Inserts `names` at positions 1..N.
async fn insert_stages<C: ConnectionTrait>(db: &C, job_id: i32, names: &[String]) -> AppResult<()> {
    if names.is_empty() {
        return Ok(());
    }
    let stages = names.iter().enumerate().map(|(index, name)| job_stage::ActiveModel {
        job_id: Set(job_id),
        name: Set(name.clone()),
        position: Set(index as i32 + 1),
        ..Default::default()
    });
    job_stage::Entity::insert_many(stages).exec(db).await?;
    Ok(())
}

pub async fn list_open_jobs<C: ConnectionTrait>(db: &C) -> AppResult<Vec<JobRead>> {
    let jobs = job::Entity::find()
        .filter(job::Column::Status.eq(STATUS_OPEN))
        .order_by_desc(job::Column::CreatedAt)
        .order_by_desc(job::Column::Id)
        .all(db)
        .await?;
    compose_jobs(db, jobs, StageOrder::AsStored).await
}

/// Jobs that are not open are indistinguishable from missing ones.
pub async fn get_open_job<C: ConnectionTrait>(db: &C, job_id: i32) -> AppResult<JobRead> {
    let job = job::Entity::find_by_id(job_id)
        .one(db)
        .await?
        .filter(job::Model::is_open)
        .ok_or_else(job_not_found)?;
    compose_job(db, job, StageOrder::AsStored).await
}

pub async fn list_owned_jobs<C: ConnectionTrait>(db: &C, recruiter_id: i32) -> AppResult<Vec<JobRead>> {
    let jobs = job::Entity::find()
        .filter(job::Column::CreatedById.eq(recruiter_id))
        .order_by_desc(job::Column::CreatedAt)
        .order_by_desc(job::Column::Id)
        .all(db)
        .await?;
    compose_jobs(db, jobs, StageOrder::ByPosition).await
}

/// Another recruiter's job is reported as missing.
pub async fn find_owned_job<C: ConnectionTrait>(db: &C, recruiter_id: i32, job_id: i32) -> AppResult<job::Model> {
    job::Entity::find_by_id(job_id)
        .one(db)
        .await?
        .filter(|job| job.is_owned_by(recruiter_id))
        .ok_or_else(job_not_found)
}

#[tracing::instrument(skip(db, recruiter, request), fields(recruiter_id = recruiter.id, title = %request.title))]
pub async fn create_job(db: &DatabaseConnection, recruiter: &user::Model, request: JobCreate) -> AppResult<JobRead> {
    validate_salary("min_salary", request.min_salary)?;
    validate_salary("max_salary", request.max_salary)?;
    let stage_names = match request.stage_names {
        Some(names) if !names.is_empty() => normalize_stage_names(names)?,
        _ => DEFAULT_STAGE_NAMES.iter().map(|s| s.to_string()).collect(),
    };

    let txn = db.begin().await?;
    let job = job::ActiveModel {
        title: Set(request.title),
        company: Set(request.company),
        location: Set(request.location),
        department: Set(request.department),
        employment_type: Set(request.employment_type),
        status: Set(request.status),
        description: Set(request.description),
        requirements: Set(request.requirements),
        min_salary: Set(request.min_salary),
        max_salary: Set(request.max_salary),
        created_by_id: Set(Some(recruiter.id)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    insert_stages(&txn, job.id, &stage_names).await?;
    txn.commit().await?;

    info!(job_id = job.id, stages = stage_names.len(), "Created job");
    compose_job(db, job, StageOrder::ByPosition).await
}

/// Partial update. A supplied `stage_names` deletes every existing stage and inserts the new
/// list; applications that sat in a removed stage are left without a stage.
#[tracing::instrument(skip(db, recruiter, request), fields(recruiter_id = recruiter.id))]
pub async fn update_job(
    db: &DatabaseConnection,
    recruiter: &user::Model,
    job_id: i32,
    request: JobUpdate,
) -> AppResult<JobRead> {
    if let Some(min_salary) = request.min_salary {
        validate_salary("min_salary", min_salary)?;
    }
    if let Some(max_salary) = request.max_salary {
        validate_salary("max_salary", max_salary)?;
    }
    let stage_names = request.stage_names.map(normalize_stage_names).transpose()?;

    let txn = db.begin().await?;
    let job = find_owned_job(&txn, recruiter.id, job_id).await?;

    let mut active: job::ActiveModel = job.clone().into();
    if let Some(title) = request.title {
        active.title = Set(title);
    }
    if let Some(company) = request.company {
        active.company = Set(company);
    }
    if let Some(location) = request.location {
        active.location = Set(location);
    }
    if let Some(department) = request.department {
        active.department = Set(department);
    }
    if let Some(employment_type) = request.employment_type {
        active.employment_type = Set(employment_type);
    }
    if let Some(status) = request.status {
        active.status = Set(status);
    }
    if let Some(description) = request.description {
        active.description = Set(description);
    }
    if let Some(requirements) = request.requirements {
        active.requirements = Set(requirements);
    }
    if let Some(min_salary) = request.min_salary {
        active.min_salary = Set(min_salary);
    }
    if let Some(max_salary) = request.max_salary {
        active.max_salary = Set(max_salary);
    }
    let job = if active.is_changed() {
        active.update(&txn).await?
    } else {
        job
    };

    if let Some(names) = stage_names {
        let old_stage_ids: Vec<i32> = job_stage::Entity::find()
            .select_only()
            .column(job_stage::Column::Id)
            .filter(job_stage::Column::JobId.eq(job.id))
            .into_tuple()
            .all(&txn)
            .await?;

        if !old_stage_ids.is_empty() {
            // Applications in a removed stage become unassigned.
            let detached = application::Entity::update_many()
                .col_expr(application::Column::StageId, Expr::value(Option::<i32>::None))
                .filter(application::Column::StageId.is_in(old_stage_ids))
                .exec(&txn)
                .await?;
            job_stage::Entity::delete_many()
                .filter(job_stage::Column::JobId.eq(job.id))
                .exec(&txn)
                .await?;
            info!(job_id = job.id, detached = detached.rows_affected, "Replaced job stages");
        }
        insert_stages(&txn, job.id, &names).await?;
    }
    txn.commit().await?;

    info!(job_id = job.id, "Updated job");
    compose_job(db, job, StageOrder::ByPosition).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary_must_be_non_negative() {
        assert!(validate_salary("min_salary", None).is_ok());
        assert!(validate_salary("min_salary", Some(0.0)).is_ok());
        assert!(validate_salary("min_salary", Some(120_000.5)).is_ok());
        assert!(validate_salary("min_salary", Some(-1.0)).is_err());
        assert!(validate_salary("max_salary", Some(f64::NAN)).is_err());
    }

    #[test]
    fn stage_names_are_trimmed_and_must_not_be_blank() {
        let names = normalize_stage_names(vec![" Applied ".into(), "Phone screen".into()]).unwrap();
        assert_eq!(names, vec!["Applied", "Phone screen"]);
        assert!(normalize_stage_names(vec!["Applied".into(), "  ".into()]).is_err());
    }
}
