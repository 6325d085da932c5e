//! Coverbook client library.
//!
//! The client-side half of the registry: a typed HTTP client and the
//! form/list controllers that a UI shell drives. Controllers talk to the
//! server through the [`gateway::RecordGateway`] trait, so every state
//! transition is testable without a socket.
//!
//! # Modules
//!
//! - [`api`] - `RegistryApi`, the reqwest-backed HTTP client
//! - [`gateway`] - The `RecordGateway` trait the controllers depend on
//! - [`form`] - The insured form state machine
//! - [`list`] - The insured list controller

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod form;
pub mod gateway;
pub mod list;

pub use api::{ApiError, RegistryApi};
pub use form::{FormEvent, FormMode, FormPhase, InsuredForm, SubmitOutcome};
pub use gateway::RecordGateway;
pub use list::InsuredList;
