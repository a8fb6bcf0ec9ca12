//! Customer and address handlers. All require an admin session.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use client_manager_core::{AddressId, CustomerId};

use super::{MessageResponse, parse_id};
use crate::error::Result;
use crate::extract::Validated;
use crate::middleware::RequireAdmin;
use crate::models::{AddAddressRequest, CreatePfCustomerRequest, CreatePjCustomerRequest, Customer};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CustomerCreated {
    pub customer_id: CustomerId,
}

#[derive(Debug, Serialize)]
pub struct AddressCreated {
    pub address_id: AddressId,
}

#[tracing::instrument(skip_all)]
pub async fn create_pf(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Validated(request): Validated<CreatePfCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerCreated>)> {
    let customer_id = state.customers().create_pf(request).await?;
    Ok((StatusCode::CREATED, Json(CustomerCreated { customer_id })))
}

#[tracing::instrument(skip_all)]
pub async fn create_pj(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Validated(request): Validated<CreatePjCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerCreated>)> {
    let customer_id = state.customers().create_pj(request).await?;
    Ok((StatusCode::CREATED, Json(CustomerCreated { customer_id })))
}

#[tracing::instrument(skip_all)]
pub async fn add_address(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Validated(request): Validated<AddAddressRequest>,
) -> Result<(StatusCode, Json<AddressCreated>)> {
    let address_id = state.customers().add_address(request).await?;
    Ok((StatusCode::CREATED, Json(AddressCreated { address_id })))
}

#[tracing::instrument(skip(state, _admin))]
pub async fn delete_address(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id: AddressId = parse_id(&id, "address")?;
    state.customers().delete_address(id).await?;
    Ok(Json(MessageResponse::new("address deleted successfully")))
}

#[tracing::instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<Customer>>> {
    Ok(Json(state.customers().list().await?))
}

#[tracing::instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<Customer>> {
    let id: CustomerId = parse_id(&id, "customer")?;
    Ok(Json(state.customers().get(id).await?))
}

#[tracing::instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id: CustomerId = parse_id(&id, "customer")?;
    state.customers().delete(id).await?;
    Ok(Json(MessageResponse::new("customer deleted successfully")))
}
