//! Coverbook Core - Shared types library.
//!
//! This crate provides the common types used across all Coverbook
//! components:
//! - `server` - The insured-registry HTTP service
//! - `client` - Form/list controllers and the typed API client
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! Validation rules live here exactly once, in [`rules`]: both the
//! server's authoritative validator and the client's pre-flight checks
//! read the same constraint table, so the two sides cannot drift.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and email addresses
//! - [`insured`] - The `Insured` entity and its unvalidated draft form
//! - [`rules`] - The canonical field-constraint table and age arithmetic
//! - [`page`] - Pagination request clamping and page-envelope math
//! - [`api`] - Wire DTOs shared by the server and the client

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod insured;
pub mod page;
pub mod rules;
pub mod types;

pub use api::{CreateInsured, ErrorBody};
pub use insured::{Insured, InsuredDraft};
pub use page::{Page, PageRequest};
pub use rules::{Field, TextRule, ValidationErrors, Violation};
pub use types::*;
