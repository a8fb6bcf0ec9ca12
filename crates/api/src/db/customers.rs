//! Customer repository for database operations.
//!
//! A customer spans three tables: `customers` (contact data), one of
//! `customers_pf` / `customers_pj` (profile) and `addresses`. Creation writes
//! the customer, its profile and its first address in one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use client_manager_core::{AddressId, CustomerId, CustomerKind};

use super::RepositoryError;
use crate::models::{Address, Customer, CustomerProfile, NewAddress, NewCustomer, NewProfile};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Customer joined with whichever profile table holds its row.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    kind: String,
    email: String,
    phone: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    cpf: Option<String>,
    pf_name: Option<String>,
    birth_date: Option<NaiveDate>,
    cnpj: Option<String>,
    company_name: Option<String>,
}

impl CustomerRow {
    fn into_customer(self, addresses: Vec<Address>) -> Result<Customer, RepositoryError> {
        let kind: CustomerKind = self
            .kind
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("customer {}: {e}", self.id)))?;

        let profile = match kind {
            CustomerKind::Pf => match (self.cpf, self.pf_name) {
                (Some(cpf), Some(pf_name)) => CustomerProfile::Pf {
                    cpf,
                    pf_name,
                    birth_date: self.birth_date,
                },
                _ => {
                    return Err(RepositoryError::DataCorruption(format!(
                        "PF customer {} has no PF profile",
                        self.id
                    )));
                }
            },
            CustomerKind::Pj => match (self.cnpj, self.company_name) {
                (Some(cnpj), Some(company_name)) => CustomerProfile::Pj { cnpj, company_name },
                _ => {
                    return Err(RepositoryError::DataCorruption(format!(
                        "PJ customer {} has no PJ profile",
                        self.id
                    )));
                }
            },
        };

        Ok(Customer {
            id: CustomerId::new(self.id),
            kind,
            email: self.email,
            phone: self.phone,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            profile,
            addresses,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: i32,
    customer_id: Uuid,
    address_type: String,
    street: String,
    number: String,
    complement: Option<String>,
    state: String,
    city: String,
    cep: String,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            address_type: row.address_type,
            street: row.street,
            number: row.number,
            complement: row.complement,
            state: row.state,
            city: row.city,
            cep: row.cep,
        }
    }
}

const CUSTOMER_SELECT: &str = r"
    SELECT c.id, c.type::text AS kind, c.email, c.phone, c.is_active,
           c.created_at, c.updated_at,
           pf.cpf, pf.name AS pf_name, pf.birth_date,
           pj.cnpj, pj.company_name
    FROM client_manager.customers c
    LEFT JOIN client_manager.customers_pf pf ON pf.customer_id = c.id
    LEFT JOIN client_manager.customers_pj pj ON pj.customer_id = c.id
";

const ADDRESS_COLUMNS: &str =
    "id, customer_id, address_type, street, number, complement, state, city, cep";

// =============================================================================
// Repository
// =============================================================================

/// Storage for customers and their addresses.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert a customer with its profile and first address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if email, phone, CPF or CNPJ is taken.
    async fn create(&self, customer: NewCustomer) -> Result<CustomerId, RepositoryError>;

    /// Attach another address to an existing customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if the customer does not exist.
    async fn add_address(
        &self,
        customer_id: CustomerId,
        address: NewAddress,
    ) -> Result<AddressId, RepositoryError>;

    /// Load a customer and all of its addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// Load every customer with its addresses, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// Delete a customer; addresses and services go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such customer exists.
    async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError>;

    /// Delete a single address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such address exists.
    async fn delete_address(&self, id: AddressId) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed [`CustomerRepository`].
#[derive(Clone)]
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn addresses_for(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Address>>, RepositoryError> {
        let sql = format!(
            "SELECT {ADDRESS_COLUMNS} FROM client_manager.addresses \
             WHERE customer_id = ANY($1) ORDER BY id"
        );
        let rows = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<Address>> = HashMap::new();
        for row in rows {
            grouped.entry(row.customer_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn create(&self, customer: NewCustomer) -> Result<CustomerId, RepositoryError> {
        let id = CustomerId::generate();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO client_manager.customers (id, type, email, phone)
            VALUES ($1, $2::client_manager.customer_type, $3, $4)
            ",
        )
        .bind(id)
        .bind(customer.profile.kind().as_str())
        .bind(&customer.email)
        .bind(&customer.phone)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        match &customer.profile {
            NewProfile::Pf {
                cpf,
                name,
                birth_date,
            } => {
                sqlx::query(
                    r"
                    INSERT INTO client_manager.customers_pf (customer_id, cpf, name, birth_date)
                    VALUES ($1, $2, $3, $4)
                    ",
                )
                .bind(id)
                .bind(cpf)
                .bind(name)
                .bind(birth_date)
                .execute(&mut *tx)
                .await
                .map_err(RepositoryError::from_write)?;
            }
            NewProfile::Pj { cnpj, company_name } => {
                sqlx::query(
                    r"
                    INSERT INTO client_manager.customers_pj (customer_id, cnpj, company_name)
                    VALUES ($1, $2, $3)
                    ",
                )
                .bind(id)
                .bind(cnpj)
                .bind(company_name)
                .execute(&mut *tx)
                .await
                .map_err(RepositoryError::from_write)?;
            }
        }

        insert_address(&mut tx, id, &customer.first_address).await?;
        tx.commit().await?;

        Ok(id)
    }

    async fn add_address(
        &self,
        customer_id: CustomerId,
        address: NewAddress,
    ) -> Result<AddressId, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        insert_address(&mut conn, customer_id, &address).await
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let sql = format!("{CUSTOMER_SELECT} WHERE c.id = $1");
        let Some(row) = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let mut addresses = self.addresses_for(&[row.id]).await?;
        let own = addresses.remove(&row.id).unwrap_or_default();
        row.into_customer(own).map(Some)
    }

    async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let sql = format!("{CUSTOMER_SELECT} ORDER BY c.created_at DESC");
        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut addresses = self.addresses_for(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let own = addresses.remove(&row.id).unwrap_or_default();
                row.into_customer(own)
            })
            .collect()
    }

    async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM client_manager.customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_address(&self, id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM client_manager.addresses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

async fn insert_address(
    conn: &mut sqlx::PgConnection,
    customer_id: CustomerId,
    address: &NewAddress,
) -> Result<AddressId, RepositoryError> {
    let id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO client_manager.addresses
            (customer_id, address_type, street, number, complement, state, city, cep)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        ",
    )
    .bind(customer_id)
    .bind(&address.address_type)
    .bind(&address.street)
    .bind(&address.number)
    .bind(&address.complement)
    .bind(&address.state)
    .bind(&address.city)
    .bind(&address.cep)
    .fetch_one(conn)
    .await
    .map_err(RepositoryError::from_write)?;

    Ok(AddressId::new(id))
}
