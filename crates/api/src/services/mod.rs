//! Business logic between the HTTP handlers and the repositories.
//!
//! # Services
//!
//! - `users` - Registration, password login, admin checks, bootstrap admin
//! - `customers` - PF/PJ customers and their addresses
//! - `billing` - Billable services and their status flags
//!
//! Each service owns its repository as a trait object so tests can swap the
//! `PostgreSQL` implementation for an in-memory one.

mod billing;
mod customers;
mod error;
mod password;
mod users;

pub use billing::BillingService;
pub use customers::CustomerService;
pub use error::ServiceError;
pub use password::{hash_password, verify_password};
pub use users::{SeedOutcome, UserService};
