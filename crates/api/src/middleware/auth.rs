//! Session identity resolution and authorization extractors.
//!
//! A request moves from unauthenticated, to authenticated once
//! [`RequireAuth`] resolves a [`SessionIdentity`], to authorized once
//! [`RequireAdmin`] confirms the admin flag. Handlers pick their gates by the
//! extractors they take.

use axum::{extract::FromRequestParts, http::request::Parts};
use thiserror::Error;
use tower_sessions::{Session, session};

use client_manager_core::UserId;

use crate::error::AppError;
use crate::models::{SessionIdentity, session_keys};
use crate::state::AppState;

/// Why a session carries no usable identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No identity stored, or a nil user id.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The stored value is not a `SessionIdentity`.
    #[error("malformed session identity: {0}")]
    Malformed(String),

    /// The session store failed.
    #[error("session store error: {0}")]
    Store(String),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotAuthenticated => Self::NotAuthenticated,
            IdentityError::Malformed(_) | IdentityError::Store(_) => Self::Session(err.to_string()),
        }
    }
}

/// Read the authenticated identity from a session. Read-only.
///
/// # Errors
///
/// Returns `IdentityError::NotAuthenticated` if nothing usable is stored,
/// `IdentityError::Malformed` if the stored value does not decode, and
/// `IdentityError::Store` if the store cannot be read.
pub async fn resolve_identity(session: &Session) -> Result<SessionIdentity, IdentityError> {
    let identity = session
        .get::<SessionIdentity>(session_keys::AUTHENTICATED_USER)
        .await
        .map_err(|e| match e {
            session::Error::SerdeJson(inner) => IdentityError::Malformed(inner.to_string()),
            other => IdentityError::Store(other.to_string()),
        })?
        .ok_or(IdentityError::NotAuthenticated)?;

    if identity.user_id.is_nil() {
        return Err(IdentityError::NotAuthenticated);
    }
    Ok(identity)
}

fn session_from_parts(parts: &Parts) -> Result<&Session, AppError> {
    parts
        .extensions
        .get::<Session>()
        .ok_or_else(|| AppError::Internal("session layer missing".to_string()))
}

/// Extractor that requires an authenticated session.
///
/// Rejects with 401 `must be logged in` when no identity is stored, and with
/// 500 when the stored identity cannot be read.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(identity): RequireAuth) -> impl IntoResponse {
///     identity.user_id.to_string()
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAuth(pub SessionIdentity);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts)?;
        let identity = resolve_identity(session).await.inspect_err(|e| {
            if !matches!(e, IdentityError::NotAuthenticated) {
                tracing::error!(error = %e, "Failed to resolve session identity");
            }
        })?;
        Ok(Self(identity))
    }
}

/// Extractor that requires an authenticated admin.
///
/// Runs the [`RequireAuth`] step first, then checks the admin flag through
/// the user service. An unknown user or a non-admin gets 401
/// `only admins can access this resource`; a failed lookup gets 500.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin(pub SessionIdentity);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(identity) = RequireAuth::from_request_parts(parts, state).await?;

        let is_admin = state.users().check_is_admin(identity.user_id).await?;
        if !is_admin {
            tracing::warn!(user_id = %identity.user_id, "Non-admin denied");
            return Err(AppError::NotAuthorized);
        }

        Ok(Self(identity))
    }
}

/// Store a fresh identity for `user_id`, cycling the session id first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn establish_identity(
    session: &Session,
    user_id: UserId,
) -> Result<SessionIdentity, session::Error> {
    let identity = SessionIdentity::issue(user_id);
    session.cycle_id().await?;
    session
        .insert(session_keys::AUTHENTICATED_USER, identity)
        .await?;
    Ok(identity)
}

/// Remove the identity (logout), cycling the session id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_identity(session: &Session) -> Result<(), session::Error> {
    session
        .remove::<SessionIdentity>(session_keys::AUTHENTICATED_USER)
        .await?;
    session.cycle_id().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn empty_session_is_not_authenticated() {
        let err = resolve_identity(&session()).await.unwrap_err();
        assert!(matches!(err, IdentityError::NotAuthenticated));
    }

    #[tokio::test]
    async fn established_identity_resolves() {
        let session = session();
        let user_id = UserId::generate();
        establish_identity(&session, user_id).await.unwrap();

        let identity = resolve_identity(&session).await.unwrap();
        assert_eq!(identity.user_id, user_id);
    }

    #[tokio::test]
    async fn nil_user_id_is_not_authenticated() {
        let session = session();
        let identity = SessionIdentity {
            user_id: UserId::default(),
            issued_at: Utc::now(),
        };
        session
            .insert(session_keys::AUTHENTICATED_USER, identity)
            .await
            .unwrap();

        let err = resolve_identity(&session).await.unwrap_err();
        assert!(matches!(err, IdentityError::NotAuthenticated));
    }

    #[tokio::test]
    async fn foreign_value_is_malformed() {
        let session = session();
        session
            .insert(session_keys::AUTHENTICATED_USER, "not-an-identity")
            .await
            .unwrap();

        let err = resolve_identity(&session).await.unwrap_err();
        assert!(matches!(err, IdentityError::Malformed(_)));
        assert!(matches!(AppError::from(err), AppError::Session(_)));
    }

    #[tokio::test]
    async fn cleared_identity_is_gone() {
        let session = session();
        establish_identity(&session, UserId::generate()).await.unwrap();
        clear_identity(&session).await.unwrap();

        let err = resolve_identity(&session).await.unwrap_err();
        assert!(matches!(err, IdentityError::NotAuthenticated));
    }
}
