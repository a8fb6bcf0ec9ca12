//! Service (billable engagement) repository for database operations.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use client_manager_core::{CustomerId, ServiceId};

use super::RepositoryError;
use crate::models::{NewService, Service};

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: i32,
    customer_id: Uuid,
    type_product: String,
    description: String,
    total_value: Decimal,
    down_payment: Decimal,
    is_paid: bool,
    is_finished: bool,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: ServiceId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            type_product: row.type_product,
            description: row.description,
            total_value: row.total_value,
            down_payment: row.down_payment,
            is_paid: row.is_paid,
            is_finished: row.is_finished,
        }
    }
}

const SERVICE_COLUMNS: &str =
    "id, customer_id, type_product, description, total_value, down_payment, is_paid, is_finished";

/// Which status flag a patch changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFlag {
    Finished,
    Paid,
}

impl ServiceFlag {
    const fn column(self) -> &'static str {
        match self {
            Self::Finished => "is_finished",
            Self::Paid => "is_paid",
        }
    }
}

/// Storage for billable services.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Insert a service.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if the customer does not exist.
    async fn create(&self, service: NewService) -> Result<ServiceId, RepositoryError>;

    /// All services, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list(&self) -> Result<Vec<Service>, RepositoryError>;

    /// Services belonging to one customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Service>, RepositoryError>;

    /// Number of services belonging to one customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn count_by_customer(&self, customer_id: CustomerId) -> Result<i64, RepositoryError>;

    /// Set one status flag and return the updated service.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such service exists.
    async fn set_flag(
        &self,
        id: ServiceId,
        flag: ServiceFlag,
        value: bool,
    ) -> Result<Service, RepositoryError>;

    /// Delete a service.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such service exists.
    async fn delete(&self, id: ServiceId) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed [`ServiceRepository`].
#[derive(Clone)]
pub struct PgServiceRepository {
    pool: PgPool,
}

impl PgServiceRepository {
    /// Create a new service repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PgServiceRepository {
    async fn create(&self, service: NewService) -> Result<ServiceId, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO client_manager.services
                (customer_id, type_product, description, total_value, down_payment,
                 is_paid, is_finished)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(service.customer_id)
        .bind(&service.type_product)
        .bind(&service.description)
        .bind(service.total_value)
        .bind(service.down_payment)
        .bind(service.is_paid)
        .bind(service.is_finished)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(ServiceId::new(id))
    }

    async fn list(&self) -> Result<Vec<Service>, RepositoryError> {
        let sql = format!(
            "SELECT {SERVICE_COLUMNS} FROM client_manager.services ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ServiceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Service>, RepositoryError> {
        let sql = format!(
            "SELECT {SERVICE_COLUMNS} FROM client_manager.services \
             WHERE customer_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ServiceRow>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_customer(&self, customer_id: CustomerId) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM client_manager.services WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn set_flag(
        &self,
        id: ServiceId,
        flag: ServiceFlag,
        value: bool,
    ) -> Result<Service, RepositoryError> {
        let sql = format!(
            "UPDATE client_manager.services SET {} = $2, updated_at = now() \
             WHERE id = $1 RETURNING {SERVICE_COLUMNS}",
            flag.column()
        );
        let row = sqlx::query_as::<_, ServiceRow>(&sql)
            .bind(id)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, id: ServiceId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM client_manager.services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
