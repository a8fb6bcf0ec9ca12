//! In-memory repositories for tests.
//!
//! Emulates the constraints the schema enforces: unique user email, unique
//! customer email/phone/CPF/CNPJ, and the customer foreign key on addresses
//! and services.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use client_manager_core::{AddressId, CustomerId, ServiceId, UserId};

use super::{CustomerRepository, RepositoryError, ServiceFlag, ServiceRepository, UserRepository};
use crate::models::{
    Address, Customer, CustomerProfile, NewAddress, NewCustomer, NewProfile, NewService,
    NewUser, Service, User,
};

#[derive(Default)]
struct Tables {
    users: Vec<(User, String)>,
    customers: Vec<Customer>,
    services: Vec<Service>,
    last_address_id: i32,
    last_service_id: i32,
}

/// Backing store for all three repository traits.
#[derive(Default)]
pub struct InMemoryDatabase {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn customer_exists(tables: &Tables, id: CustomerId) -> bool {
        tables.customers.iter().any(|c| c.id == id)
    }
}

fn to_address(id: AddressId, address: NewAddress) -> Address {
    Address {
        id,
        address_type: address.address_type,
        street: address.street,
        number: address.number,
        complement: address.complement,
        state: address.state,
        city: address.city,
        cep: address.cep,
    }
}

#[async_trait]
impl UserRepository for InMemoryDatabase {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|(u, _)| u.email == user.email) {
            return Err(RepositoryError::Conflict("users_email_key".into()));
        }
        let now = Utc::now();
        let created = User {
            id: UserId::generate(),
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            created_at: now,
            updated_at: now,
        };
        tables.users.push((created.clone(), user.password_hash));
        Ok(created)
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| u.email.as_str() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryDatabase {
    async fn create(&self, customer: NewCustomer) -> Result<CustomerId, RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();

        let taken = tables.customers.iter().any(|c| {
            c.email == customer.email
                || c.phone == customer.phone
                || match (&c.profile, &customer.profile) {
                    (CustomerProfile::Pf { cpf: a, .. }, NewProfile::Pf { cpf: b, .. }) => a == b,
                    (CustomerProfile::Pj { cnpj: a, .. }, NewProfile::Pj { cnpj: b, .. }) => {
                        a == b
                    }
                    _ => false,
                }
        });
        if taken {
            return Err(RepositoryError::Conflict("customers_unique".into()));
        }

        tables.last_address_id += 1;
        let address = to_address(
            AddressId::new(tables.last_address_id),
            customer.first_address,
        );
        let profile = match customer.profile {
            NewProfile::Pf {
                cpf,
                name,
                birth_date,
            } => CustomerProfile::Pf {
                cpf,
                pf_name: name,
                birth_date,
            },
            NewProfile::Pj { cnpj, company_name } => CustomerProfile::Pj { cnpj, company_name },
        };

        let now = Utc::now();
        let id = CustomerId::generate();
        tables.customers.push(Customer {
            id,
            kind: profile.kind(),
            email: customer.email,
            phone: customer.phone,
            is_active: true,
            created_at: now,
            updated_at: now,
            profile,
            addresses: vec![address],
        });
        Ok(id)
    }

    async fn add_address(
        &self,
        customer_id: CustomerId,
        address: NewAddress,
    ) -> Result<AddressId, RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        if !Self::customer_exists(&tables, customer_id) {
            return Err(RepositoryError::MissingReference(
                "addresses_customer_id_fkey".into(),
            ));
        }
        tables.last_address_id += 1;
        let id = AddressId::new(tables.last_address_id);
        if let Some(customer) = tables.customers.iter_mut().find(|c| c.id == customer_id) {
            customer.addresses.push(to_address(id, address));
        }
        Ok(id)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.customers.iter().rev().cloned().collect())
    }

    async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.customers.len();
        tables.customers.retain(|c| c.id != id);
        if tables.customers.len() == before {
            return Err(RepositoryError::NotFound);
        }
        tables.services.retain(|s| s.customer_id != id);
        Ok(())
    }

    async fn delete_address(&self, id: AddressId) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        for customer in &mut tables.customers {
            let before = customer.addresses.len();
            customer.addresses.retain(|a| a.id != id);
            if customer.addresses.len() != before {
                return Ok(());
            }
        }
        Err(RepositoryError::NotFound)
    }
}

#[async_trait]
impl ServiceRepository for InMemoryDatabase {
    async fn create(&self, service: NewService) -> Result<ServiceId, RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        if !Self::customer_exists(&tables, service.customer_id) {
            return Err(RepositoryError::MissingReference(
                "services_customer_id_fkey".into(),
            ));
        }
        tables.last_service_id += 1;
        let id = ServiceId::new(tables.last_service_id);
        tables.services.push(Service {
            id,
            customer_id: service.customer_id,
            type_product: service.type_product,
            description: service.description,
            total_value: service.total_value,
            down_payment: service.down_payment,
            is_paid: service.is_paid,
            is_finished: service.is_finished,
        });
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Service>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.services.iter().rev().cloned().collect())
    }

    async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Service>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .services
            .iter()
            .rev()
            .filter(|s| s.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn count_by_customer(&self, customer_id: CustomerId) -> Result<i64, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        let count = tables
            .services
            .iter()
            .filter(|s| s.customer_id == customer_id)
            .count();
        Ok(i64::try_from(count).unwrap())
    }

    async fn set_flag(
        &self,
        id: ServiceId,
        flag: ServiceFlag,
        value: bool,
    ) -> Result<Service, RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        let service = tables
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RepositoryError::NotFound)?;
        match flag {
            ServiceFlag::Finished => service.is_finished = value,
            ServiceFlag::Paid => service.is_paid = value,
        }
        Ok(service.clone())
    }

    async fn delete(&self, id: ServiceId) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.services.len();
        tables.services.retain(|s| s.id != id);
        if tables.services.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
