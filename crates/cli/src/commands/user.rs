//! User management command.
//!
//! Goes through `UserService`, so validation and hashing match registration
//! over HTTP.

use std::sync::Arc;

use client_manager_api::db::PgUserRepository;
use client_manager_api::models::CreateUserRequest;
use client_manager_api::services::UserService;

use super::{CommandError, connect};

/// Create a user.
///
/// # Errors
///
/// Returns `CommandError::Service` if a field is invalid or the email is taken.
pub async fn create(
    name: String,
    email: String,
    password: String,
    is_admin: bool,
) -> Result<(), CommandError> {
    let pool = connect().await?;
    let users = UserService::new(Arc::new(PgUserRepository::new(pool)));

    let user = users
        .create(CreateUserRequest {
            name,
            email,
            password,
            is_admin,
        })
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Admin: {}",
        user.id,
        user.email,
        user.is_admin
    );
    Ok(())
}
