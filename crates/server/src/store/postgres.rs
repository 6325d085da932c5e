//! `PostgreSQL` storage backend.
//!
//! Queries use sqlx's runtime-checked API so the build has no database
//! dependency. Unique-key violations surface as database errors and are
//! mapped back to the duplicate-id/duplicate-email store errors by
//! constraint name; that mapping is what makes concurrent writes safe
//! without any application-level locking.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use coverbook_core::{Email, Insured, InsuredId, PageRequest};

use super::{InsuredStore, StoreError};

/// Name of the unique constraint on `insured.email`.
const EMAIL_CONSTRAINT: &str = "insured_email_key";

/// Internal row type for `PostgreSQL` insured queries.
#[derive(Debug, sqlx::FromRow)]
struct InsuredRow {
    id: i64,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    second_last_name: String,
    phone: String,
    email: String,
    birth_date: NaiveDate,
    estimated_insured_value: Decimal,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<InsuredRow> for Insured {
    type Error = StoreError;

    fn try_from(row: InsuredRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            StoreError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: InsuredId::new(row.id),
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            second_last_name: row.second_last_name,
            phone: row.phone,
            email,
            birth_date: row.birth_date,
            estimated_insured_value: row.estimated_insured_value,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, first_name, middle_name, last_name, second_last_name, \
     phone, email, birth_date, estimated_insured_value, notes, created_at, updated_at \
     FROM insured";

/// Escape LIKE wildcards so the fragment matches literally.
fn escape_like(fragment: &str) -> String {
    fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Map an insert error, attributing unique violations by constraint name.
fn map_insert_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        if db_err.constraint() == Some(EMAIL_CONSTRAINT) {
            return StoreError::DuplicateEmail;
        }
        return StoreError::DuplicateId;
    }
    StoreError::Database(e)
}

/// Repository for insured records in `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store over a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InsuredStore for PgStore {
    async fn page(&self, request: PageRequest) -> Result<(Vec<Insured>, i64), StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM insured")
            .fetch_one(&self.pool)
            .await?;

        let rows: Vec<InsuredRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(request.page_size())
        .bind(request.offset())
        .fetch_all(&self.pool)
        .await?;

        let insureds = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((insureds, total))
    }

    async fn fetch(&self, id: InsuredId) -> Result<Option<Insured>, StoreError> {
        let row: Option<InsuredRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn search_by_id_fragment(&self, fragment: &str) -> Result<Vec<Insured>, StoreError> {
        let pattern = format!("%{}%", escape_like(fragment));
        let rows: Vec<InsuredRow> = sqlx::query_as(&format!(
            r"{SELECT_COLUMNS} WHERE id::text LIKE $1 ESCAPE '\' ORDER BY created_at DESC, id DESC"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn contains(&self, id: InsuredId) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM insured WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn email_owner(&self, email: &Email) -> Result<Option<InsuredId>, StoreError> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM insured WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id.map(InsuredId::new))
    }

    async fn insert(&self, insured: &Insured) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO insured (id, first_name, middle_name, last_name, second_last_name, \
             phone, email, birth_date, estimated_insured_value, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(insured.id)
        .bind(&insured.first_name)
        .bind(&insured.middle_name)
        .bind(&insured.last_name)
        .bind(&insured.second_last_name)
        .bind(&insured.phone)
        .bind(&insured.email)
        .bind(insured.birth_date)
        .bind(insured.estimated_insured_value)
        .bind(&insured.notes)
        .bind(insured.created_at)
        .bind(insured.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(())
    }

    async fn replace(&self, insured: &Insured) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE insured SET first_name = $2, middle_name = $3, last_name = $4, \
             second_last_name = $5, phone = $6, email = $7, birth_date = $8, \
             estimated_insured_value = $9, notes = $10, updated_at = $11 \
             WHERE id = $1",
        )
        .bind(insured.id)
        .bind(&insured.first_name)
        .bind(&insured.middle_name)
        .bind(&insured.last_name)
        .bind(&insured.second_last_name)
        .bind(&insured.phone)
        .bind(&insured.email)
        .bind(insured.birth_date)
        .bind(insured.estimated_insured_value)
        .bind(&insured.notes)
        .bind(insured.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // The id never changes on update, so a unique violation here
            // can only be the email.
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::DuplicateEmail;
            }
            StoreError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, id: InsuredId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM insured WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
