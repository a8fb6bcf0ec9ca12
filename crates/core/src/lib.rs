//! Client Manager Core - Shared types and validation rules.
//!
//! This crate provides the domain vocabulary used across all Client Manager
//! components:
//! - `api` - The session-authenticated REST backend
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure validation rules - no
//! I/O, no database access, no HTTP. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and customer kinds
//! - [`validation`] - Field rules and the [`Validatable`] trait

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{FieldErrors, Validatable};
