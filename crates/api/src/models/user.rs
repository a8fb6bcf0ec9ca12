//! User domain types and request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use client_manager_core::validation::rules::{self, NAME_LEN, PASSWORD_LEN};
use client_manager_core::{Email, FieldErrors, UserId, Validatable};

/// An API account (domain type). The password hash never leaves the
/// repository layer except for credential checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Body of `POST /users/register`.
///
/// `role` is the admin flag. Missing fields decode as empty and are reported
/// by validation.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "role")]
    pub is_admin: bool,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

impl Validatable for CreateUserRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(
            "name",
            rules::length_between(&self.name, NAME_LEN),
            "must be between 5 and 100 characters",
        );
        errors.check(
            "email",
            rules::is_valid_email(&self.email),
            "must be a valid email address",
        );
        errors.check(
            "password",
            rules::length_between(&self.password, PASSWORD_LEN),
            "must be between 8 and 100 characters",
        );
        errors.into_result()
    }
}

/// Body of `POST /users/login`. Not validated: any mismatch is reported as
/// invalid credentials.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
