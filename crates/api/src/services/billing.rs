//! Billable services and their status flags.

use std::sync::Arc;

use client_manager_core::{CustomerId, ServiceId};

use super::error::{ServiceError, not_found_or};
use crate::db::{RepositoryError, ServiceFlag, ServiceRepository};
use crate::models::{CreateServiceRequest, Service};

/// Billing service.
#[derive(Clone)]
pub struct BillingService {
    repo: Arc<dyn ServiceRepository>,
}

impl BillingService {
    #[must_use]
    pub fn new(repo: Arc<dyn ServiceRepository>) -> Self {
        Self { repo }
    }

    /// Record a service for a customer.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::CustomerNotFound` if the customer does not exist.
    pub async fn create(&self, request: CreateServiceRequest) -> Result<ServiceId, ServiceError> {
        let customer_id = request.customer_id;
        let id = self
            .repo
            .create(request.into())
            .await
            .map_err(|e| match e {
                RepositoryError::MissingReference(_) => ServiceError::CustomerNotFound,
                other => ServiceError::Repository(other),
            })?;

        tracing::info!(service_id = %id, customer_id = %customer_id, "Service created");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn list(&self) -> Result<Vec<Service>, ServiceError> {
        Ok(self.repo.list().await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Service>, ServiceError> {
        Ok(self.repo.list_by_customer(customer_id).await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn count_by_customer(&self, customer_id: CustomerId) -> Result<i64, ServiceError> {
        Ok(self.repo.count_by_customer(customer_id).await?)
    }

    /// Set `is_finished`, leaving `is_paid` untouched.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no such service exists.
    pub async fn set_finished(&self, id: ServiceId, status: bool) -> Result<Service, ServiceError> {
        self.set_flag(id, ServiceFlag::Finished, status).await
    }

    /// Set `is_paid`, leaving `is_finished` untouched.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no such service exists.
    pub async fn set_paid(&self, id: ServiceId, status: bool) -> Result<Service, ServiceError> {
        self.set_flag(id, ServiceFlag::Paid, status).await
    }

    async fn set_flag(
        &self,
        id: ServiceId,
        flag: ServiceFlag,
        status: bool,
    ) -> Result<Service, ServiceError> {
        let service = self
            .repo
            .set_flag(id, flag, status)
            .await
            .map_err(not_found_or("service"))?;
        tracing::info!(service_id = %id, ?flag, status, "Service status changed");
        Ok(service)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no such service exists.
    pub async fn delete(&self, id: ServiceId) -> Result<(), ServiceError> {
        self.repo.delete(id).await.map_err(not_found_or("service"))?;
        tracing::info!(service_id = %id, "Service deleted");
        Ok(())
    }
}
