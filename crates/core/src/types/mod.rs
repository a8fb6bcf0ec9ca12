//! Core types for Client Manager.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod customer;
pub mod email;
pub mod id;

pub use customer::{CustomerKind, CustomerKindError};
pub use email::{Email, EmailError};
pub use id::*;
