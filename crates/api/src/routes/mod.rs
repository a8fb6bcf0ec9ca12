//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                         - Liveness
//! GET    /health/ready                   - Readiness (database ping)
//!
//! # Users (prefix /api/v1)
//! POST   /users/register                 - Create user (admin)
//! POST   /users/login                    - Password login, establishes session
//! POST   /users/logout                   - End session (auth)
//!
//! # Customers (admin)
//! POST   /customers/pf                   - Create individual customer
//! POST   /customers/pj                   - Create company customer
//! POST   /customers/address              - Add address to customer
//! DELETE /customers/address/{id}         - Delete address
//! GET    /customers                      - List customers
//! GET    /customers/{id}                 - Customer detail
//! DELETE /customers/{id}                 - Delete customer
//!
//! # Services (admin)
//! POST   /services                       - Create service
//! GET    /services                       - List services
//! DELETE /services?id=                   - Delete service
//! GET    /services/customer/{id}         - Services of a customer
//! GET    /services/count/{id}            - Service count of a customer
//! PATCH  /services/finish                - Set is_finished
//! PATCH  /services/payment               - Set is_paid
//! ```

pub mod customers;
pub mod health;
pub mod services;
pub mod users;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// API version prefix.
pub const API_PREFIX: &str = "/api/v1";

/// Body of responses that only confirm an action.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Parse a path or query identifier, rejecting with 400.
pub(crate) fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid {what} id")))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/logout", post(users::logout))
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::list))
        .route("/pf", post(customers::create_pf))
        .route("/pj", post(customers::create_pj))
        .route("/address", post(customers::add_address))
        .route("/address/{id}", delete(customers::delete_address))
        .route("/{id}", get(customers::show).delete(customers::delete))
}

/// Create the service routes router.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(services::create)
                .get(services::list)
                .delete(services::delete),
        )
        .route("/customer/{id}", get(services::list_by_customer))
        .route("/count/{id}", get(services::count_by_customer))
        .route("/finish", patch(services::finish))
        .route("/payment", patch(services::payment))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/users", user_routes())
        .nest("/customers", customer_routes())
        .nest("/services", service_routes());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest(API_PREFIX, api)
}
