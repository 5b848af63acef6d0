use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection failed: {message}")]
    Connection { message: String },

    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("Profile not found: {profile_id}")]
    ProfileNotFound { profile_id: String },

    #[error("Progress session not found: {session_id}")]
    ProgressNotFound { session_id: String },

    #[error("Migration failed: {message}")]
    Migration { message: String },

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Email gateway errors
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email gateway unavailable: {message} (retries: {retries})")]
    Unavailable { message: String, retries: u32 },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors surfaced to HTTP clients.
///
/// Maps onto the response taxonomy: validation failures become 400,
/// unknown ids and tokens become 404, everything upstream becomes a
/// logged 500 with a generic body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Email error: {0}")]
    Email(EmailError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        // Missing rows are a client-visible 404, not a server fault.
        match err {
            StorageError::ProfileNotFound { .. } => ApiError::NotFound {
                resource: "profile".to_string(),
            },
            StorageError::ProgressNotFound { .. } => ApiError::NotFound {
                resource: "assessment progress".to_string(),
            },
            other => ApiError::Storage(other),
        }
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        ApiError::Email(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Api(e) => e,
            AppError::Storage(e) => e.into(),
            AppError::Email(e) => e.into(),
            other => ApiError::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Storage(e) => {
                error!(error = %e, "Storage failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Email(e) => {
                error!(error = %e, "Email gateway failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal { message } => {
                error!(error = %message, "Internal failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for email gateway operations
pub type EmailResult<T> = Result<T, EmailError>;

/// Result type alias for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;
