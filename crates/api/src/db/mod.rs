//! Database operations for the `client_manager` `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `users` - API accounts (argon2 password hashes, admin flag)
//! - `customers` - Shared contact data for PF and PJ customers
//! - `customers_pf` / `customers_pj` - Per-kind profile
//! - `addresses` - Customer addresses (1:N)
//! - `services` - Billable engagements per customer
//! - `tower_sessions.session` - Session storage
//!
//! Each table group sits behind a repository trait so the service layer can be
//! exercised without a database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p client-manager-cli -- migrate
//! ```

pub mod customers;
#[cfg(test)]
pub mod memory;
pub mod services;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::{CustomerRepository, PgCustomerRepository};
pub use services::{PgServiceRepository, ServiceFlag, ServiceRepository};
pub use users::{PgUserRepository, UserRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A referenced row (e.g., the owning customer) does not exist.
    #[error("missing reference: {0}")]
    MissingReference(String),
}

impl RepositoryError {
    /// Classify a write error by the constraint it violated.
    pub(crate) fn from_write(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = error {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_owned();
                return Self::Conflict(constraint);
            }
            if db_err.is_foreign_key_violation() {
                let constraint = db_err.constraint().unwrap_or("foreign key").to_owned();
                return Self::MissingReference(constraint);
            }
        }
        Self::Database(error)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Check that the database answers queries.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the round trip fails.
pub async fn ping(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
