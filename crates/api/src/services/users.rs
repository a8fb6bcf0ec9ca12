//! User accounts: registration, password login and admin checks.

use std::sync::Arc;

use client_manager_core::{Email, FieldErrors, UserId, Validatable};

use super::error::ServiceError;
use super::password::{hash_password, verify_dummy_password, verify_password};
use crate::db::{RepositoryError, UserRepository};
use crate::models::{CreateUserRequest, NewUser, User};

/// Result of bootstrapping the admin account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(UserId),
    AlreadySeeded,
}

/// User account service.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    #[must_use]
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Validate, hash and store a new user.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if a field is invalid.
    /// Returns `ServiceError::DuplicateEmailOrUsername` if the email is taken.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, ServiceError> {
        request.validate()?;

        let email = Email::parse(&request.email).map_err(|e| {
            let mut errors = FieldErrors::new();
            errors.add("email", e.to_string());
            ServiceError::Validation(errors)
        })?;
        let password_hash = hash_password(&request.password)?;

        let user = self
            .repo
            .create(NewUser {
                name: request.name,
                email,
                password_hash,
                is_admin: request.is_admin,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ServiceError::DuplicateEmailOrUsername,
                other => ServiceError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, is_admin = user.is_admin, "User created");
        Ok(user)
    }

    /// Check an email/password pair.
    ///
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller, in both the error and the argon2 work done.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidCredentials` on any mismatch.
    pub async fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, ServiceError> {
        let Some((user, password_hash)) = self.repo.find_credentials(email).await? else {
            verify_dummy_password(password);
            return Err(ServiceError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;
        Ok(user)
    }

    /// Whether the user exists and carries the admin flag.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the lookup fails.
    pub async fn check_is_admin(&self, user_id: UserId) -> Result<bool, ServiceError> {
        let user = self.repo.find_by_id(user_id).await?;
        Ok(user.is_some_and(|u| u.is_admin))
    }

    /// Create the bootstrap admin unless that email is already registered.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the configured values are invalid.
    pub async fn seed_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SeedOutcome, ServiceError> {
        let request = CreateUserRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            is_admin: true,
        };

        match self.create(request).await {
            Ok(user) => Ok(SeedOutcome::Created(user.id)),
            Err(ServiceError::DuplicateEmailOrUsername) => Ok(SeedOutcome::AlreadySeeded),
            Err(e) => Err(e),
        }
    }

    /// Check the user store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if it is not.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        self.repo.ping().await.map_err(Into::into)
    }
}
