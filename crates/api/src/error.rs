//! Unified error handling with Sentry integration.
//!
//! `AppError` is the only place a domain error becomes an HTTP status. Every
//! error body has the shape `{"error": "<message>"}`; validation failures add
//! a `fields` object naming each rejected field.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use client_manager_core::FieldErrors;

use crate::db::RepositoryError;
use crate::services::ServiceError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more request fields failed validation.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// Malformed path or query parameter.
    #[error("{0}")]
    BadRequest(String),

    /// Unique data (email, phone, tax id) already taken.
    #[error("{0}")]
    DuplicateData(String),

    /// Body could not be decoded.
    #[error("{0}")]
    MalformedInput(String),

    /// No authenticated session.
    #[error("must be logged in")]
    NotAuthenticated,

    /// Authenticated, but not an admin.
    #[error("only admins can access this resource")]
    NotAuthorized,

    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateData(_) | Self::MalformedInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotAuthenticated | Self::NotAuthorized | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Repository(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Repository(_) | Self::Session(_) | Self::Internal(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = if self.is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let fields = match &self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        };

        let body = ErrorBody {
            error: &message,
            fields,
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(fields) => Self::Validation(fields),
            ServiceError::DuplicateData | ServiceError::DuplicateEmailOrUsername => {
                Self::DuplicateData(err.to_string())
            }
            ServiceError::InvalidCredentials => Self::InvalidCredentials,
            ServiceError::CustomerNotFound | ServiceError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            ServiceError::PasswordHash => Self::Internal(err.to_string()),
            ServiceError::Repository(inner) => Self::Repository(inner),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
