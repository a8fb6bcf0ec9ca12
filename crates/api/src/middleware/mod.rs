//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, per-request hub)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Authentication and the admin check are extractors, not layers, so each
//! handler states the gates it needs in its signature.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{
    IdentityError, RequireAdmin, RequireAuth, clear_identity, establish_identity,
    resolve_identity,
};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
