//! Customer domain types and request payloads.
//!
//! A customer is either an individual (PF) or a company (PJ). Both share
//! contact data and own one or more addresses; the first address is supplied
//! with the creation request.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use client_manager_core::validation::rules::{
    self, ADDRESS_TYPE_MAX, CITY_MAX, COMPLEMENT_MAX, NAME_LEN, NUMBER_MAX, STATE_MAX, STREET_MAX,
};
use client_manager_core::{AddressId, CustomerId, CustomerKind, FieldErrors, Validatable};

/// A customer address (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub address_type: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub state: String,
    pub city: String,
    pub cep: String,
}

/// Kind-specific part of a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerProfile {
    Pf {
        cpf: String,
        pf_name: String,
        birth_date: Option<NaiveDate>,
    },
    Pj {
        cnpj: String,
        company_name: String,
    },
}

impl CustomerProfile {
    #[must_use]
    pub const fn kind(&self) -> CustomerKind {
        match self {
            Self::Pf { .. } => CustomerKind::Pf,
            Self::Pj { .. } => CustomerKind::Pj,
        }
    }
}

/// A customer with its addresses (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(rename = "type")]
    pub kind: CustomerKind,
    pub email: String,
    pub phone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: CustomerProfile,
    pub addresses: Vec<Address>,
}

// =============================================================================
// Repository input
// =============================================================================

/// Address data ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub address_type: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub state: String,
    pub city: String,
    pub cep: String,
}

/// Profile data ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewProfile {
    Pf {
        cpf: String,
        name: String,
        birth_date: Option<NaiveDate>,
    },
    Pj {
        cnpj: String,
        company_name: String,
    },
}

impl NewProfile {
    #[must_use]
    pub const fn kind(&self) -> CustomerKind {
        match self {
            Self::Pf { .. } => CustomerKind::Pf,
            Self::Pj { .. } => CustomerKind::Pj,
        }
    }
}

/// A customer, its profile and its first address, inserted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub email: String,
    pub phone: String,
    pub profile: NewProfile,
    pub first_address: NewAddress,
}

// =============================================================================
// Request payloads
// =============================================================================

/// Address fields shared by the creation and add-address payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddressFields {
    pub address_type: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub state: String,
    pub city: String,
    pub cep: String,
}

impl AddressFields {
    fn check(&self, errors: &mut FieldErrors) {
        let widths = [
            ("address_type", self.address_type.as_str(), ADDRESS_TYPE_MAX),
            ("street", self.street.as_str(), STREET_MAX),
            ("number", self.number.as_str(), NUMBER_MAX),
            ("complement", self.complement.as_deref().unwrap_or_default(), COMPLEMENT_MAX),
            ("state", self.state.as_str(), STATE_MAX),
            ("city", self.city.as_str(), CITY_MAX),
        ];
        for (field, value, max) in widths {
            if !rules::at_most(value, max) {
                errors.add(field, format!("must be at most {max} characters"));
            }
        }
        errors.check(
            "cep",
            rules::is_valid_cep(&self.cep),
            "must be a valid CEP (00000-000)",
        );
    }
}

impl From<AddressFields> for NewAddress {
    fn from(fields: AddressFields) -> Self {
        Self {
            address_type: fields.address_type,
            street: fields.street,
            number: fields.number,
            complement: fields.complement.filter(|c| !c.trim().is_empty()),
            state: fields.state,
            city: fields.city,
            cep: fields.cep,
        }
    }
}

fn check_contact(errors: &mut FieldErrors, email: &str, phone: &str) {
    errors.check(
        "email",
        rules::is_valid_email(email),
        "must be a valid email address",
    );
    errors.check(
        "phone",
        rules::is_valid_phone(phone),
        "must be a valid phone number",
    );
}

/// Body of `POST /customers/pf`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePfCustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
    /// `YYYY-MM-DD` or `DD-MM-YYYY`; empty means absent.
    pub birth_date: Option<String>,
    #[serde(flatten)]
    pub address: AddressFields,
}

impl CreatePfCustomerRequest {
    fn birth_date_text(&self) -> Option<&str> {
        self.birth_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Convert into repository input. Call only after [`Validatable::validate`]
    /// succeeded; an unparseable birth date is dropped.
    ///
    /// Phone and CPF are stored as digits only so that differently
    /// punctuated spellings collide on the unique columns.
    #[must_use]
    pub fn into_new_customer(self) -> NewCustomer {
        let birth_date = self.birth_date_text().and_then(rules::parse_birth_date);
        NewCustomer {
            email: self.email,
            phone: rules::digits_only(&self.phone),
            profile: NewProfile::Pf {
                cpf: rules::digits_only(&self.cpf),
                name: self.name,
                birth_date,
            },
            first_address: self.address.into(),
        }
    }
}

impl Validatable for CreatePfCustomerRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(
            "name",
            rules::length_between(&self.name, NAME_LEN),
            "must be between 5 and 100 characters",
        );
        check_contact(&mut errors, &self.email, &self.phone);
        errors.check("cpf", rules::is_valid_cpf(&self.cpf), "must be a valid CPF");
        if let Some(text) = self.birth_date_text() {
            errors.check(
                "birth_date",
                rules::parse_birth_date(text).is_some(),
                "must be a valid date (YYYY-MM-DD or DD-MM-YYYY)",
            );
        }
        self.address.check(&mut errors);
        errors.into_result()
    }
}

/// Body of `POST /customers/pj`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePjCustomerRequest {
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub cnpj: String,
    #[serde(flatten)]
    pub address: AddressFields,
}

impl CreatePjCustomerRequest {
    #[must_use]
    pub fn into_new_customer(self) -> NewCustomer {
        NewCustomer {
            email: self.email,
            phone: rules::digits_only(&self.phone),
            profile: NewProfile::Pj {
                cnpj: rules::digits_only(&self.cnpj),
                company_name: self.company_name,
            },
            first_address: self.address.into(),
        }
    }
}

impl Validatable for CreatePjCustomerRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(
            "company_name",
            rules::length_between(&self.company_name, NAME_LEN),
            "must be between 5 and 100 characters",
        );
        check_contact(&mut errors, &self.email, &self.phone);
        errors.check(
            "cnpj",
            rules::is_valid_cnpj(&self.cnpj),
            "must be a valid CNPJ",
        );
        self.address.check(&mut errors);
        errors.into_result()
    }
}

/// Body of `POST /customers/address`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddAddressRequest {
    pub customer_id: CustomerId,
    #[serde(flatten)]
    pub address: AddressFields,
}

impl Validatable for AddAddressRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("customer_id", !self.customer_id.is_nil(), "is required");
        self.address.check(&mut errors);
        errors.into_result()
    }
}
