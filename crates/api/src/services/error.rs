//! Service layer error types.

use thiserror::Error;

use client_manager_core::FieldErrors;

use crate::db::RepositoryError;

/// Errors that can occur in the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed field validation.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// A customer with the same email, phone, CPF or CNPJ already exists.
    #[error("cpf, phone or email already exists")]
    DuplicateData,

    /// A user with the same email already exists.
    #[error("username or email already exists")]
    DuplicateEmailOrUsername,

    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The referenced customer does not exist.
    #[error("customer not found")]
    CustomerNotFound,

    /// The requested entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Map a repository error for an operation addressing a single `entity` row.
pub(super) fn not_found_or(entity: &'static str) -> impl Fn(RepositoryError) -> ServiceError {
    move |error| match error {
        RepositoryError::NotFound => ServiceError::NotFound(entity),
        other => ServiceError::Repository(other),
    }
}
