//! Domain models and request payloads.
//!
//! Domain types are separate from database row types; request payloads
//! implement [`client_manager_core::Validatable`].

pub mod customer;
pub mod service;
pub mod session;
pub mod user;

pub use customer::{
    AddAddressRequest, Address, AddressFields, CreatePfCustomerRequest, CreatePjCustomerRequest,
    Customer, CustomerProfile, NewAddress, NewCustomer, NewProfile,
};
pub use service::{CreateServiceRequest, NewService, Service, UpdateServiceStatusRequest};
pub use session::{SessionIdentity, keys as session_keys};
pub use user::{CreateUserRequest, LoginRequest, NewUser, User};
