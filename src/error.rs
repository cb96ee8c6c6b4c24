use axum::{
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{sqlx, DbErr, RuntimeErr, SqlErr};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Failure talking to the external resume parser.
#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("Resume parsing service not configured")]
    NotConfigured,
    #[error("Resume parsing service timed out")]
    Timeout,
    #[error("Resume parsing service unavailable")]
    Unavailable,
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl DependencyError {
    fn status_code(&self) -> StatusCode {
        match self {
            DependencyError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            DependencyError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            DependencyError::Unavailable => StatusCode::BAD_GATEWAY,
            DependencyError::Rejected { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            DependencyError::NotConfigured => "DEPENDENCY_NOT_CONFIGURED",
            DependencyError::Timeout => "DEPENDENCY_TIMEOUT",
            DependencyError::Unavailable => "DEPENDENCY_UNAVAILABLE",
            DependencyError::Rejected { .. } => "DEPENDENCY_REJECTED",
        }
    }
}

/// Every failure a request can end in. Not-owned resources are reported as `NotFound`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    /// Message is always generic; the cause is never revealed to the caller.
    #[error("{0}")]
    Authentication(String),

    #[error("Not allowed")]
    Authorization,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_credentials() -> Self {
        Self::Authentication("Invalid credentials".to_string())
    }

    pub fn invalid_token() -> Self {
        Self::Authentication("Could not validate credentials".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Dependency(dep) => dep.status_code(),
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Authentication(_) => "AUTHENTICATION_ERROR",
            AppError::Authorization => "AUTHORIZATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Dependency(dep) => dep.code(),
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{err:#}"))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Validation(format!("malformed multipart body: {}", err.body_text()))
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::Validation(err.body_text())
    }
}

/// True when the storage layer refused a write because of a unique index.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// True when a transaction lost a write race: SQLite busy/locked or a Postgres
/// serialization failure or deadlock. Re-running the whole transaction is safe.
pub fn is_write_contention(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return false,
    };
    let RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) = runtime else {
        return false;
    };
    match db_err.code().as_deref() {
        // SQLITE_BUSY, SQLITE_LOCKED and their extended codes
        Some("5" | "6" | "261" | "262" | "517" | "773") => true,
        Some("40001" | "40P01") => true,
        _ => db_err.message().contains("database is locked"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                "A database error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                "An internal server error occurred".to_string()
            }
            AppError::Dependency(e) => {
                tracing::error!("Resume parser error: {e}");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "code": self.code(),
        }));

        if matches!(self, AppError::Authentication(_)) {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(AppError::validation("bad").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::invalid_token().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Authorization.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn dependency_failures_map_to_gateway_codes() {
        let status = |e: DependencyError| AppError::from(e).status_code();

        assert_eq!(status(DependencyError::NotConfigured), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status(DependencyError::Timeout), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(status(DependencyError::Unavailable), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status(DependencyError::Rejected { status: 422, message: "unreadable".into() }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(DependencyError::Rejected { status: 200, message: "odd".into() }),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn authentication_errors_carry_challenge_header() {
        let response = AppError::invalid_credentials().into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = AppError::Database(DbErr::Custom("relation \"users\" does not exist".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!is_unique_violation(&DbErr::Custom("nope".into())));
        assert!(!is_write_contention(&DbErr::Custom("database is locked".into())));
    }
}
