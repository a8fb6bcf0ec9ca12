//! Registration, login and logout.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tower_sessions::Session;

use client_manager_core::UserId;

use super::MessageResponse;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::extract::{JsonBody, Validated};
use crate::middleware::{RequireAdmin, RequireAuth, clear_identity, establish_identity};
use crate::models::{CreateUserRequest, LoginRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
}

/// Create a user. Admin only.
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Validated(request): Validated<CreateUserRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let user = state.users().create(request).await?;
    tracing::info!(admin_id = %admin.user_id, user_id = %user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { user_id: user.id }),
    ))
}

/// Check credentials and store the identity in a fresh session.
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<MessageResponse>> {
    let user = state
        .users()
        .authenticate_user(&request.email, &request.password)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Login failed"))?;

    establish_identity(&session, user.id)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(MessageResponse::new("logged in successfully")))
}

/// Drop the identity from the session.
#[tracing::instrument(skip_all)]
pub async fn logout(
    RequireAuth(identity): RequireAuth,
    session: Session,
) -> Result<Json<MessageResponse>> {
    clear_identity(&session)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;

    clear_sentry_user();
    tracing::info!(user_id = %identity.user_id, "User logged out");

    Ok(Json(MessageResponse::new("logged out successfully")))
}
