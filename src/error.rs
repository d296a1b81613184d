use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{storage::StorageError, validation::ValidationErrors};

/// RepoError
///
/// Failure raised by a content store. Each backend maps its native errors into
/// one of these variants so handlers never see driver-specific types.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("document store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("document store returned {status}: {message}")]
    Firestore { status: u16, message: String },

    #[error("malformed document {name}: {reason}")]
    MalformedDocument { name: String, reason: String },

    #[error("document store credentials: {0}")]
    Credentials(String),

    #[error("content store is not configured: {0}")]
    NotConfigured(&'static str),

    /// A storage-level uniqueness rule rejected the write.
    #[error("duplicate value: {0}")]
    Conflict(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// AppError
///
/// HTTP-facing error type returned by every handler and extractor.
/// Rendered as `{"detail": ..., "code": ...}`; validation failures render the
/// field map directly so clients see `{"title": ["This field may not be blank."]}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("validation failed")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Store(#[from] RepoError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match self {
            AppError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            AppError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "NOT_AUTHENTICATED", msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "PERMISSION_DENIED", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "PARSE_ERROR", msg),
            AppError::Store(RepoError::Conflict(msg)) => (StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::Store(err) => {
                tracing::error!(error = %err, "content store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Storage(err) => {
                tracing::error!(error = %err, "media storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail, "code": code }))).into_response()
    }
}

/// Unwraps a JSON body extracted as `Result<Json<T>, JsonRejection>`, turning
/// decode failures into a 400 instead of axum's default 422 plain-text reply.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(value)| value).map_err(AppError::from)
}
