//! Billable service domain types and request payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use client_manager_core::validation::rules::{self, DESCRIPTION_LEN, TYPE_PRODUCT_MAX};
use client_manager_core::{CustomerId, FieldErrors, ServiceId, Validatable};

/// Work performed for a customer. Amounts serialize as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub customer_id: CustomerId,
    pub type_product: String,
    pub description: String,
    pub total_value: Decimal,
    pub down_payment: Decimal,
    pub is_paid: bool,
    pub is_finished: bool,
}

/// Input for inserting a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewService {
    pub customer_id: CustomerId,
    pub type_product: String,
    pub description: String,
    pub total_value: Decimal,
    pub down_payment: Decimal,
    pub is_paid: bool,
    pub is_finished: bool,
}

const AMOUNT_MESSAGE: &str =
    "must be between 0 and 9999999999.99 with at most 2 decimal places";

/// Body of `POST /services`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateServiceRequest {
    pub customer_id: CustomerId,
    pub type_product: String,
    pub description: String,
    pub total_value: Decimal,
    pub down_payment: Decimal,
    pub is_paid: bool,
    pub is_finished: bool,
}

impl Validatable for CreateServiceRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("customer_id", !self.customer_id.is_nil(), "is required");
        errors.check(
            "type_product",
            !rules::is_blank(&self.type_product),
            "is required",
        );
        errors.check(
            "type_product",
            rules::at_most(&self.type_product, TYPE_PRODUCT_MAX),
            "must be at most 100 characters",
        );
        errors.check(
            "description",
            rules::length_between(&self.description, DESCRIPTION_LEN),
            "must be between 5 and 255 characters",
        );
        errors.check(
            "total_value",
            rules::is_valid_amount(self.total_value),
            AMOUNT_MESSAGE,
        );
        errors.check(
            "down_payment",
            rules::is_valid_amount(self.down_payment),
            AMOUNT_MESSAGE,
        );
        errors.into_result()
    }
}

impl From<CreateServiceRequest> for NewService {
    fn from(req: CreateServiceRequest) -> Self {
        Self {
            customer_id: req.customer_id,
            type_product: req.type_product,
            description: req.description,
            total_value: req.total_value,
            down_payment: req.down_payment,
            is_paid: req.is_paid,
            is_finished: req.is_finished,
        }
    }
}

/// Body of `PATCH /services/finish` and `PATCH /services/payment`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct UpdateServiceStatusRequest {
    pub id: ServiceId,
    pub status: bool,
}

impl Validatable for UpdateServiceStatusRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("id", self.id.as_i32() > 0, "must be a positive service id");
        errors.into_result()
    }
}
