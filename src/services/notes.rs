//! Recruiter notes on applications. Append-only.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::info;

use crate::entities::{application_note, user};
use crate::error::{AppError, AppResult};
use crate::services::pipeline::find_owned_application;
use crate::services::views::{compose_application, ApplicationRead, Audience};

#[tracing::instrument(skip(db, recruiter, body), fields(recruiter_id = recruiter.id))]
pub async fn add_note(
    db: &DatabaseConnection,
    recruiter: &user::Model,
    application_id: i32,
    body: String,
) -> AppResult<ApplicationRead> {
    if body.trim().is_empty() {
        return Err(AppError::validation("note body must not be empty"));
    }
    let (application, _job) = find_owned_application(db, recruiter.id, application_id).await?;

    let note = application_note::ActiveModel {
        application_id: Set(application.id),
        author_id: Set(Some(recruiter.id)),
        body: Set(body),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(application_id, note_id = note.id, "Note added");
    compose_application(db, application, Audience::Recruiter).await
}
