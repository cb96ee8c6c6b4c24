use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::routes::ApiJson;
use crate::schemas::{LoginRequest, RegisterRequest};
use crate::security::AuthUser;
use crate::services::identity;
use crate::services::views::{TokenResponse, UserRead};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserRead),
        (status = 400, description = "Malformed email or unknown role"),
        (status = 409, description = "Email already registered")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserRead>)> {
    let user = identity::register(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(UserRead::from(&user))))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
#[tracing::instrument(skip_all, fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let (access_token, user) = identity::login(&state.db, &state.tokens, &payload.email, &payload.password).await?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        role: user.role,
        full_name: user.full_name,
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller profile", body = UserRead),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn me(AuthUser(user): AuthUser) -> Json<UserRead> {
    Json(UserRead::from(&user))
}
