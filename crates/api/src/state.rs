//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::{
    CustomerRepository, PgCustomerRepository, PgServiceRepository, PgUserRepository,
    ServiceRepository, UserRepository,
};
use crate::services::{BillingService, CustomerService, UserService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the services, each of which owns its
/// repository.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    users: UserService,
    customers: CustomerService,
    billing: BillingService,
}

impl AppState {
    /// Create state backed by `PostgreSQL`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::from_repositories(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgCustomerRepository::new(pool.clone())),
            Arc::new(PgServiceRepository::new(pool)),
        )
    }

    /// Create state from arbitrary repository implementations.
    #[must_use]
    pub fn from_repositories(
        users: Arc<dyn UserRepository>,
        customers: Arc<dyn CustomerRepository>,
        services: Arc<dyn ServiceRepository>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                users: UserService::new(users),
                customers: CustomerService::new(customers),
                billing: BillingService::new(services),
            }),
        }
    }

    #[must_use]
    pub fn users(&self) -> &UserService {
        &self.inner.users
    }

    #[must_use]
    pub fn customers(&self) -> &CustomerService {
        &self.inner.customers
    }

    #[must_use]
    pub fn billing(&self) -> &BillingService {
        &self.inner.billing
    }
}
