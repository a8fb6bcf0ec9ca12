//! Customers and their addresses.

use std::sync::Arc;

use client_manager_core::{AddressId, CustomerId};

use super::error::{ServiceError, not_found_or};
use crate::db::{CustomerRepository, RepositoryError};
use crate::models::{
    AddAddressRequest, CreatePfCustomerRequest, CreatePjCustomerRequest, Customer, NewCustomer,
};

/// Customer service.
#[derive(Clone)]
pub struct CustomerService {
    repo: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    #[must_use]
    pub fn new(repo: Arc<dyn CustomerRepository>) -> Self {
        Self { repo }
    }

    /// Create an individual (PF) customer with its first address.
    ///
    /// The request must already be validated.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::DuplicateData` if email, phone or CPF is taken.
    pub async fn create_pf(
        &self,
        request: CreatePfCustomerRequest,
    ) -> Result<CustomerId, ServiceError> {
        self.create(request.into_new_customer()).await
    }

    /// Create a company (PJ) customer with its first address.
    ///
    /// The request must already be validated.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::DuplicateData` if email, phone or CNPJ is taken.
    pub async fn create_pj(
        &self,
        request: CreatePjCustomerRequest,
    ) -> Result<CustomerId, ServiceError> {
        self.create(request.into_new_customer()).await
    }

    async fn create(&self, customer: NewCustomer) -> Result<CustomerId, ServiceError> {
        let kind = customer.profile.kind();
        let id = self.repo.create(customer).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => ServiceError::DuplicateData,
            other => ServiceError::Repository(other),
        })?;

        tracing::info!(customer_id = %id, kind = %kind, "Customer created");
        Ok(id)
    }

    /// Attach an address to an existing customer.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::CustomerNotFound` if the customer does not exist.
    pub async fn add_address(&self, request: AddAddressRequest) -> Result<AddressId, ServiceError> {
        self.repo
            .add_address(request.customer_id, request.address.into())
            .await
            .map_err(|e| match e {
                RepositoryError::MissingReference(_) => ServiceError::CustomerNotFound,
                other => ServiceError::Repository(other),
            })
    }

    /// Load one customer with its addresses.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no such customer exists.
    pub async fn get(&self, id: CustomerId) -> Result<Customer, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("customer"))
    }

    /// Every customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn list(&self) -> Result<Vec<Customer>, ServiceError> {
        Ok(self.repo.list().await?)
    }

    /// Delete a customer together with its addresses and services.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no such customer exists.
    pub async fn delete(&self, id: CustomerId) -> Result<(), ServiceError> {
        self.repo.delete(id).await.map_err(not_found_or("customer"))?;
        tracing::info!(customer_id = %id, "Customer deleted");
        Ok(())
    }

    /// Delete one address.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no such address exists.
    pub async fn delete_address(&self, id: AddressId) -> Result<(), ServiceError> {
        self.repo
            .delete_address(id)
            .await
            .map_err(not_found_or("address"))
    }
}
