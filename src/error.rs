use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Message returned for every authentication failure. Kept identical for a
/// missing header, a bad signature, an expired token and wrong credentials.
pub const UNAUTHENTICATED_MESSAGE: &str = "Not authorized";

/// Postgres SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// AppError
///
/// The error taxonomy of the API. Every handler returns `AppResult<T>`, and the
/// `IntoResponse` implementation below is the single place where a failure is
/// mapped to an HTTP status and the `{ message, error? }` body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Required fields missing or values outside their declared domain.
    /// Holds the offending field names (or a parser message for malformed JSON).
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// A Skill with the same name already exists.
    #[error("duplicate skill name: {0}")]
    DuplicateName(String),

    /// Missing/malformed/expired/tampered token, or failed login.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The referenced entity id does not resolve.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias for handler and repository return values.
pub type AppResult<T> = Result<T, AppError>;

/// ErrorBody
///
/// Wire shape of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors.errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        AppError::Validation(fields)
    }
}

impl AppError {
    /// Maps a write error against the skills table, turning the unique name
    /// constraint into `DuplicateName`.
    pub fn from_skill_write(err: sqlx::Error, name: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                return AppError::DuplicateName(name.to_string());
            }
        }
        AppError::Database(err)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateName(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(fields) => ErrorBody {
                message: "Validation failed".to_string(),
                error: Some(fields.join(", ")),
            },
            AppError::DuplicateName(name) => ErrorBody {
                message: "Skill with this name already exists".to_string(),
                error: Some(name),
            },
            AppError::Unauthenticated => {
                tracing::debug!("rejected unauthenticated request");
                ErrorBody {
                    message: UNAUTHENTICATED_MESSAGE.to_string(),
                    error: None,
                }
            }
            AppError::NotFound(entity) => ErrorBody {
                message: format!("{entity} not found"),
                error: None,
            },
            AppError::Database(err) => {
                tracing::error!(error = %err, "database failure");
                ErrorBody {
                    message: "Server error".to_string(),
                    error: Some(err.to_string()),
                }
            }
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "internal failure");
                ErrorBody {
                    message: "Server error".to_string(),
                    error: Some(detail),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
