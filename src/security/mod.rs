//! Bearer authentication and role gating as axum extractors.

pub mod password;
pub mod token;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

use crate::entities::{user, Role};
use crate::error::AppError;
use crate::services::identity;
use crate::state::AppState;

pub use token::{Claims, TokenService};

pub const RECRUITER_ROLES: &[Role] = &[Role::Recruiter, Role::Admin];
pub const CANDIDATE_ROLES: &[Role] = &[Role::Candidate];

/// Any caller holding a valid access token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

/// Caller with the `candidate` role.
#[derive(Debug, Clone)]
pub struct CandidateUser(pub user::Model);

/// Caller with the `recruiter` or `admin` role.
#[derive(Debug, Clone)]
pub struct RecruiterUser(pub user::Model);

/// Extracts the credential from `Authorization: Bearer <token>`. The scheme is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(AppError::invalid_token)?;
        let user = identity::resolve(&state.db, &state.tokens, token).await?;
        Ok(AuthUser(user))
    }
}

impl FromRequestParts<AppState> for CandidateUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        identity::authorize(&user, CANDIDATE_ROLES)?;
        Ok(CandidateUser(user))
    }
}

impl FromRequestParts<AppState> for RecruiterUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        identity::authorize(&user, RECRUITER_ROLES)?;
        Ok(RecruiterUser(user))
    }
}
