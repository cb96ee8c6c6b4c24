pub mod auth;
pub mod candidate;
pub mod health;
pub mod public;
pub mod recruiter;

use axum::{
    extract::FromRequest,
    routing::{get, post},
    Router,
};

use crate::error::AppError;
use crate::state::AppState;

/// `axum::Json` whose rejections render as `AppError` bodies.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Every API route, relative to the configured prefix.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/jobs", get(public::list_jobs))
        .route("/jobs/{job_id}", get(public::job_detail))
        .route(
            "/candidate/profile",
            get(candidate::get_profile).patch(candidate::update_profile),
        )
        .route(
            "/candidate/applications",
            get(candidate::list_applications).post(candidate::apply),
        )
        .route("/candidate/resume/autofill", post(candidate::autofill_resume))
        .route(
            "/recruiter/jobs",
            get(recruiter::list_jobs).post(recruiter::create_job),
        )
        .route(
            "/recruiter/jobs/{job_id}",
            get(recruiter::job_detail).patch(recruiter::update_job),
        )
        .route(
            "/recruiter/applications/{application_id}/move",
            post(recruiter::move_application),
        )
        .route(
            "/recruiter/applications/{application_id}/notes",
            post(recruiter::add_note),
        )
}
