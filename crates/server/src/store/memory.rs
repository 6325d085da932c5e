//! In-memory storage backend.
//!
//! Backs the test suites and `coverbook-cli seed --dry-run`. All rows
//! live under one lock, so the uniqueness checks and the write they
//! guard are a single atomic step, matching the guarantee the
//! `PostgreSQL` backend gets from its unique indexes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use coverbook_core::{Email, Insured, InsuredId, PageRequest};

use super::{InsuredStore, StoreError};

/// Insured storage held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<i64, Insured>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

/// Newest first, id descending as the tiebreak.
fn sorted_desc(rows: &BTreeMap<i64, Insured>) -> Vec<Insured> {
    let mut all: Vec<Insured> = rows.values().cloned().collect();
    all.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    all
}

#[async_trait]
impl InsuredStore for MemoryStore {
    async fn page(&self, request: PageRequest) -> Result<(Vec<Insured>, i64), StoreError> {
        let rows = self.rows.lock().await;
        let all = sorted_desc(&rows);
        let total = i64::try_from(all.len()).unwrap_or(i64::MAX);
        let page = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.page_size()).unwrap_or(0))
            .collect();
        Ok((page, total))
    }

    async fn fetch(&self, id: InsuredId) -> Result<Option<Insured>, StoreError> {
        Ok(self.rows.lock().await.get(&id.as_i64()).cloned())
    }

    async fn search_by_id_fragment(&self, fragment: &str) -> Result<Vec<Insured>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(sorted_desc(&rows)
            .into_iter()
            .filter(|insured| insured.id.to_string().contains(fragment))
            .collect())
    }

    async fn contains(&self, id: InsuredId) -> Result<bool, StoreError> {
        Ok(self.rows.lock().await.contains_key(&id.as_i64()))
    }

    async fn email_owner(&self, email: &Email) -> Result<Option<InsuredId>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|insured| insured.email == *email)
            .map(|insured| insured.id))
    }

    async fn insert(&self, insured: &Insured) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(&insured.id.as_i64()) {
            return Err(StoreError::DuplicateId);
        }
        if rows.values().any(|row| row.email == insured.email) {
            return Err(StoreError::DuplicateEmail);
        }
        rows.insert(insured.id.as_i64(), insured.clone());
        Ok(())
    }

    async fn replace(&self, insured: &Insured) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().await;
        if !rows.contains_key(&insured.id.as_i64()) {
            return Ok(false);
        }
        if rows
            .values()
            .any(|row| row.id != insured.id && row.email == insured.email)
        {
            return Err(StoreError::DuplicateEmail);
        }
        rows.insert(insured.id.as_i64(), insured.clone());
        Ok(true)
    }

    async fn remove(&self, id: InsuredId) -> Result<bool, StoreError> {
        Ok(self.rows.lock().await.remove(&id.as_i64()).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;

    fn insured(id: i64, email: &str, created_secs: i64) -> Insured {
        Insured {
            id: InsuredId::new(id),
            first_name: "Test".to_owned(),
            middle_name: None,
            last_name: "Person".to_owned(),
            second_last_name: "Example".to_owned(),
            phone: "3000000000".to_owned(),
            email: Email::parse(email).unwrap(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            estimated_insured_value: Decimal::new(100_000, 2),
            notes: None,
            created_at: Utc.timestamp_opt(created_secs, 0).unwrap(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let store = MemoryStore::new();
        store.insert(&insured(1, "a@example.com", 0)).await.unwrap();
        let err = store
            .insert(&insured(1, "b@example.com", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_email() {
        let store = MemoryStore::new();
        store.insert(&insured(1, "a@example.com", 0)).await.unwrap();
        let err = store
            .insert(&insured(2, "a@example.com", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_replace_keeps_own_email() {
        let store = MemoryStore::new();
        store.insert(&insured(1, "a@example.com", 0)).await.unwrap();
        assert!(store.replace(&insured(1, "a@example.com", 0)).await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_rejects_email_of_other_row() {
        let store = MemoryStore::new();
        store.insert(&insured(1, "a@example.com", 0)).await.unwrap();
        store.insert(&insured(2, "b@example.com", 1)).await.unwrap();
        let err = store
            .replace(&insured(2, "a@example.com", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_page_orders_newest_first() {
        let store = MemoryStore::new();
        store.insert(&insured(1, "a@example.com", 10)).await.unwrap();
        store.insert(&insured(2, "b@example.com", 30)).await.unwrap();
        store.insert(&insured(3, "c@example.com", 20)).await.unwrap();

        let (page, total) = store.page(PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(total, 3);
        let ids: Vec<i64> = page.iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_search_matches_id_substring() {
        let store = MemoryStore::new();
        store.insert(&insured(1234, "a@example.com", 0)).await.unwrap();
        store.insert(&insured(5678, "b@example.com", 1)).await.unwrap();
        store.insert(&insured(8123, "c@example.com", 2)).await.unwrap();

        let hits = store.search_by_id_fragment("123").await.unwrap();
        let ids: Vec<i64> = hits.iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(ids, vec![8123, 1234]);
    }
}
