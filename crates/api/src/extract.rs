//! JSON body extractors.
//!
//! Undecodable bodies become `AppError::MalformedInput` (422) so every
//! rejection shares the `{"error": ...}` body shape.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use client_manager_core::Validatable;

use crate::error::AppError;

/// JSON body that has passed [`Validatable::validate`].
///
/// Decoding failures reject with 422; field violations reject with 400 and
/// list every offending field.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validatable,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        value.validate().map_err(AppError::Validation)?;
        Ok(Self(value))
    }
}

/// JSON body without validation.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::MalformedInput(rejection.body_text()))?;
        Ok(Self(value))
    }
}
