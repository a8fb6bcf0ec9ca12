//! Billable service handlers. All require an admin session.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use client_manager_core::{CustomerId, ServiceId};

use super::{MessageResponse, parse_id};
use crate::error::{AppError, Result};
use crate::extract::Validated;
use crate::middleware::RequireAdmin;
use crate::models::{CreateServiceRequest, Service, UpdateServiceStatusRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceCreated {
    pub service_id: ServiceId,
}

#[derive(Debug, Serialize)]
pub struct ServiceCount {
    pub count: i64,
}

/// Query of `DELETE /services`.
#[derive(Debug, Deserialize)]
pub struct DeleteServiceQuery {
    pub id: Option<String>,
}

#[tracing::instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Validated(request): Validated<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceCreated>)> {
    let service_id = state.billing().create(request).await?;
    Ok((StatusCode::CREATED, Json(ServiceCreated { service_id })))
}

#[tracing::instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<Service>>> {
    Ok(Json(state.billing().list().await?))
}

#[tracing::instrument(skip(state, _admin))]
pub async fn list_by_customer(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<Vec<Service>>> {
    let customer_id: CustomerId = parse_id(&id, "customer")?;
    Ok(Json(state.billing().list_by_customer(customer_id).await?))
}

#[tracing::instrument(skip(state, _admin))]
pub async fn count_by_customer(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<ServiceCount>> {
    let customer_id: CustomerId = parse_id(&id, "customer")?;
    let count = state.billing().count_by_customer(customer_id).await?;
    Ok(Json(ServiceCount { count }))
}

#[tracing::instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<DeleteServiceQuery>,
) -> Result<Json<MessageResponse>> {
    let raw = query
        .id
        .ok_or_else(|| AppError::BadRequest("missing service id".to_string()))?;
    let id: ServiceId = parse_id(&raw, "service")?;
    state.billing().delete(id).await?;
    Ok(Json(MessageResponse::new("service deleted successfully")))
}

#[tracing::instrument(skip_all)]
pub async fn finish(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Validated(request): Validated<UpdateServiceStatusRequest>,
) -> Result<Json<Service>> {
    let service = state
        .billing()
        .set_finished(request.id, request.status)
        .await?;
    Ok(Json(service))
}

#[tracing::instrument(skip_all)]
pub async fn payment(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Validated(request): Validated<UpdateServiceStatusRequest>,
) -> Result<Json<Service>> {
    let service = state.billing().set_paid(request.id, request.status).await?;
    Ok(Json(service))
}
