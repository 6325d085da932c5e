//! Durable storage for the insured registry.
//!
//! The service talks to storage through the [`InsuredStore`] trait so the
//! same validation and stamping logic runs against `PostgreSQL` in
//! production and against [`MemoryStore`] in tests. Uniqueness of the
//! identification number and the email is a *storage* responsibility:
//! both backends enforce it atomically at write time, so a race between
//! two writers is resolved by the second insert failing, never by the
//! service's fast-path pre-checks.

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use coverbook_core::{Email, Insured, InsuredId, PageRequest};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The identification number is already taken.
    #[error("identification number already exists")]
    DuplicateId,

    /// The email is already registered.
    #[error("email already exists")]
    DuplicateEmail,
}

/// Storage backend for insured records.
///
/// Writes must enforce the unique-id and unique-email invariants
/// atomically and report violations as [`StoreError::DuplicateId`] /
/// [`StoreError::DuplicateEmail`].
#[async_trait]
pub trait InsuredStore: Send + Sync {
    /// One page of records ordered by `created_at` descending (newest
    /// first, id descending as the tiebreak), plus the total count.
    async fn page(&self, request: PageRequest) -> Result<(Vec<Insured>, i64), StoreError>;

    /// Fetch a record by id.
    async fn fetch(&self, id: InsuredId) -> Result<Option<Insured>, StoreError>;

    /// Records whose id's decimal-string representation contains
    /// `fragment`, ordered like [`InsuredStore::page`].
    async fn search_by_id_fragment(&self, fragment: &str) -> Result<Vec<Insured>, StoreError>;

    /// Whether a record with this id exists.
    async fn contains(&self, id: InsuredId) -> Result<bool, StoreError>;

    /// The id currently holding this email, if any.
    async fn email_owner(&self, email: &Email) -> Result<Option<InsuredId>, StoreError>;

    /// Insert a new record.
    async fn insert(&self, insured: &Insured) -> Result<(), StoreError>;

    /// Replace an existing record in full. Returns `false` if the id
    /// does not exist.
    async fn replace(&self, insured: &Insured) -> Result<bool, StoreError>;

    /// Delete a record. Returns `false` if the id does not exist.
    async fn remove(&self, id: InsuredId) -> Result<bool, StoreError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
