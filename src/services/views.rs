//! Response shapes, and the composer that assembles them per caller role.
//!
//! Candidates see their own applications without recruiter notes; recruiters see the
//! full note history with resolved author names.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{application, application_note, job, job_stage, user, Role};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserRead {
    pub id: i32,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&user::Model> for UserRead {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            phone: user.phone.clone(),
            location: user.location.clone(),
            bio: user.bio.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub role: Role,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct JobStageRead {
    pub id: i32,
    pub name: String,
    pub position: i32,
}

impl From<&job_stage::Model> for JobStageRead {
    fn from(stage: &job_stage::Model) -> Self {
        Self {
            id: stage.id,
            name: stage.name.clone(),
            position: stage.position,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobRead {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub location: String,
    pub department: Option<String>,
    pub employment_type: String,
    pub status: String,
    pub description: String,
    pub requirements: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub stages: Vec<JobStageRead>,
    pub applications_count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApplicationNoteRead {
    pub id: i32,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Option<i32>,
    /// `null` once the author account is gone.
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApplicationRead {
    pub id: i32,
    pub status: String,
    pub resume_path: Option<String>,
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub stage: Option<JobStageRead>,
    pub job_id: i32,
    pub job_title: String,
    pub candidate: UserRead,
    pub notes: Vec<ApplicationNoteRead>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecruiterJobDetail {
    pub job: JobRead,
    pub applications: Vec<ApplicationRead>,
}

/// Who an application is being shaped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Candidate,
    Recruiter,
}

/// Public listings keep stages in storage order; recruiter listings sort by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOrder {
    AsStored,
    ByPosition,
}

fn unique_ids(ids: impl IntoIterator<Item = i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Attaches stages and application counts to each job, preserving the input order.
pub async fn compose_jobs<C: ConnectionTrait>(
    db: &C,
    jobs: Vec<job::Model>,
    order: StageOrder,
) -> AppResult<Vec<JobRead>> {
    if jobs.is_empty() {
        return Ok(Vec::new());
    }
    let job_ids: Vec<i32> = jobs.iter().map(|j| j.id).collect();

    let mut stage_query = job_stage::Entity::find().filter(job_stage::Column::JobId.is_in(job_ids.clone()));
    stage_query = match order {
        StageOrder::AsStored => stage_query.order_by_asc(job_stage::Column::Id),
        StageOrder::ByPosition => stage_query
            .order_by_asc(job_stage::Column::Position)
            .order_by_asc(job_stage::Column::Id),
    };
    let mut stages_by_job: HashMap<i32, Vec<JobStageRead>> = HashMap::new();
    for stage in stage_query.all(db).await? {
        stages_by_job
            .entry(stage.job_id)
            .or_default()
            .push(JobStageRead::from(&stage));
    }

    let counts: HashMap<i32, i64> = application::Entity::find()
        .select_only()
        .column(application::Column::JobId)
        .column_as(application::Column::Id.count(), "applications_count")
        .filter(application::Column::JobId.is_in(job_ids))
        .group_by(application::Column::JobId)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    Ok(jobs
        .into_iter()
        .map(|job| JobRead {
            stages: stages_by_job.remove(&job.id).unwrap_or_default(),
            applications_count: counts.get(&job.id).copied().unwrap_or(0).max(0) as u64,
            id: job.id,
            title: job.title,
            company: job.company,
            location: job.location,
            department: job.department,
            employment_type: job.employment_type,
            status: job.status,
            description: job.description,
            requirements: job.requirements,
            min_salary: job.min_salary,
            max_salary: job.max_salary,
            created_at: job.created_at,
        })
        .collect())
}

pub async fn compose_job<C: ConnectionTrait>(db: &C, job: job::Model, order: StageOrder) -> AppResult<JobRead> {
    compose_jobs(db, vec![job], order)
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("job composition produced no result".to_string()))
}

/// Shapes applications for `audience`, batching the lookups of jobs, stages, candidates,
/// and (for recruiters only) notes with their authors.
pub async fn compose_applications<C: ConnectionTrait>(
    db: &C,
    applications: Vec<application::Model>,
    audience: Audience,
) -> AppResult<Vec<ApplicationRead>> {
    if applications.is_empty() {
        return Ok(Vec::new());
    }

    let job_ids = unique_ids(applications.iter().map(|a| a.job_id));
    let jobs: HashMap<i32, job::Model> = job::Entity::find()
        .filter(job::Column::Id.is_in(job_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|j| (j.id, j))
        .collect();

    let stage_ids = unique_ids(applications.iter().filter_map(|a| a.stage_id));
    let stages: HashMap<i32, job_stage::Model> = if stage_ids.is_empty() {
        HashMap::new()
    } else {
        job_stage::Entity::find()
            .filter(job_stage::Column::Id.is_in(stage_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect()
    };

    let mut notes_by_application: HashMap<i32, Vec<application_note::Model>> = HashMap::new();
    if audience == Audience::Recruiter {
        let notes = application_note::Entity::find()
            .filter(application_note::Column::ApplicationId.is_in(applications.iter().map(|a| a.id).collect::<Vec<_>>()))
            .order_by_asc(application_note::Column::CreatedAt)
            .order_by_asc(application_note::Column::Id)
            .all(db)
            .await?;
        for note in notes {
            notes_by_application.entry(note.application_id).or_default().push(note);
        }
    }

    let user_ids = unique_ids(
        applications.iter().map(|a| a.candidate_id).chain(
            notes_by_application
                .values()
                .flatten()
                .filter_map(|n| n.author_id),
        ),
    );
    let users: HashMap<i32, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    applications
        .into_iter()
        .map(|app| {
            let job = jobs
                .get(&app.job_id)
                .ok_or_else(|| AppError::Internal(format!("application {} has no job", app.id)))?;
            let candidate = users
                .get(&app.candidate_id)
                .ok_or_else(|| AppError::Internal(format!("application {} has no candidate", app.id)))?;

            let notes = notes_by_application
                .remove(&app.id)
                .unwrap_or_default()
                .into_iter()
                .map(|note| ApplicationNoteRead {
                    author_name: note
                        .author_id
                        .and_then(|id| users.get(&id))
                        .and_then(|author| author.full_name.clone()),
                    id: note.id,
                    body: note.body,
                    created_at: note.created_at,
                    author_id: note.author_id,
                })
                .collect();

            Ok(ApplicationRead {
                id: app.id,
                status: app.status,
                resume_path: app.resume_path,
                cover_letter: app.cover_letter,
                created_at: app.created_at,
                updated_at: app.updated_at,
                stage: app.stage_id.and_then(|id| stages.get(&id)).map(JobStageRead::from),
                job_id: job.id,
                job_title: job.title.clone(),
                candidate: UserRead::from(candidate),
                notes,
            })
        })
        .collect()
}

pub async fn compose_application<C: ConnectionTrait>(
    db: &C,
    application: application::Model,
    audience: Audience,
) -> AppResult<ApplicationRead> {
    compose_applications(db, vec![application], audience)
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("application composition produced no result".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_ids_keeps_first_occurrence_order() {
        assert_eq!(unique_ids([3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(unique_ids(Vec::<i32>::new()).is_empty());
    }
}
