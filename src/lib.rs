pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod routes;
pub mod schemas;
pub mod security;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::header, http::HeaderValue, http::Method, routing::get, Router};
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    openapi::Server,
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
pub use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Recruit Flow API",
        version = "0.1.0",
        description = "Job postings, hiring pipelines, applications and recruiter notes"
    ),
    paths(
        routes::health::health_check,
        routes::auth::register,
        routes::auth::login,
        routes::auth::me,
        routes::public::list_jobs,
        routes::public::job_detail,
        routes::candidate::get_profile,
        routes::candidate::update_profile,
        routes::candidate::list_applications,
        routes::candidate::apply,
        routes::candidate::autofill_resume,
        routes::recruiter::list_jobs,
        routes::recruiter::create_job,
        routes::recruiter::job_detail,
        routes::recruiter::update_job,
        routes::recruiter::move_application,
        routes::recruiter::add_note
    ),
    components(schemas(
        entities::Role,
        schemas::RegisterRequest,
        schemas::LoginRequest,
        schemas::ProfileUpdate,
        schemas::JobCreate,
        schemas::JobUpdate,
        schemas::ApplicationMove,
        schemas::NoteCreate,
        schemas::ApplicationForm,
        schemas::ResumeForm,
        services::views::UserRead,
        services::views::TokenResponse,
        services::views::JobStageRead,
        services::views::JobRead,
        services::views::ApplicationNoteRead,
        services::views::ApplicationRead,
        services::views::RecruiterJobDetail,
        routes::health::HealthResponse
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and the caller's identity"),
        (name = "jobs", description = "Public job board"),
        (name = "candidate", description = "Candidate profile and applications"),
        (name = "recruiter", description = "Job and pipeline management")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// A `*` entry allows any origin without credentials; otherwise only the listed origins,
/// with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Per-IP limiting on the API routes. A burst of 0 leaves the router untouched.
fn with_rate_limit(api: Router<AppState>, config: &Config) -> Router<AppState> {
    if config.rate_limit_burst == 0 {
        return api;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(config.rate_limit_per_second.max(1))
        .burst_size(config.rate_limit_burst)
        .finish();
    match governor_conf {
        Some(governor_conf) => {
            info!(
                per_second = config.rate_limit_per_second,
                burst = config.rate_limit_burst,
                "Rate limiting enabled"
            );
            api.layer(GovernorLayer {
                config: Arc::new(governor_conf),
            })
        }
        None => {
            warn!("Invalid rate limit settings; rate limiting disabled");
            api
        }
    }
}

/// Create the application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut api_doc = ApiDoc::openapi();
    if !config.api_prefix.is_empty() {
        api_doc.servers = Some(vec![Server::new(config.api_prefix.clone())]);
    }

    let api_routes = with_rate_limit(routes::api_router(), &config);

    // `/health` also answers at the root for load balancer health checks.
    let app = if config.api_prefix.is_empty() {
        Router::new().merge(api_routes)
    } else {
        Router::new()
            .route("/health", get(routes::health::health_check))
            .nest(&config.api_prefix, api_routes)
    };

    app.nest_service("/uploads", ServeDir::new(config.uploads_root()))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", api_doc))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
