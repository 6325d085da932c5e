//! The insured registry service.
//!
//! Owns the validation-and-persistence contract: every rule is enforced
//! here, in a fixed order, before anything touches storage. The HTTP
//! layer only translates errors; storage only enforces the unique keys.

use std::sync::Arc;

use coverbook_core::{
    CreateInsured, Email, Insured, InsuredDraft, InsuredId, Page, PageRequest, ValidationErrors,
    rules,
};

use crate::clock::Clock;
use crate::store::{InsuredStore, StoreError};

/// Errors produced by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// One or more fields failed shape validation.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Input that violates a business rule (blank search, future birth
    /// date, underage).
    #[error("{0}")]
    InvalidArgument(String),

    /// Duplicate identification number or email.
    #[error("{0}")]
    Conflict(String),

    /// No insured with this identification number.
    #[error("no insured found with identification {0}")]
    NotFound(InsuredId),

    /// Storage failure.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            // Duplicates lost a race with a concurrent writer; report the
            // same conflict the pre-checks would have.
            StoreError::DuplicateId => {
                Self::Conflict("an insured with this identification number already exists".into())
            }
            StoreError::DuplicateEmail => {
                Self::Conflict("this email is already registered to another insured".into())
            }
            other => Self::Store(other),
        }
    }
}

/// The registry service. Cheap to clone; all state is shared.
#[derive(Clone)]
pub struct InsuredService {
    store: Arc<dyn InsuredStore>,
    clock: Arc<dyn Clock>,
}

impl InsuredService {
    pub fn new(store: Arc<dyn InsuredStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// One page of insureds, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if storage fails.
    pub async fn list(&self, request: PageRequest) -> Result<Page<Insured>, ServiceError> {
        let (items, total) = self.store.page(request).await?;
        Ok(Page::new(items, request, total))
    }

    /// Fetch one insured by identification number.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the id is unknown.
    pub async fn get(&self, id: InsuredId) -> Result<Insured, ServiceError> {
        self.store
            .fetch(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Insureds whose identification number contains `fragment`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidArgument` for a blank fragment.
    pub async fn search(&self, fragment: &str) -> Result<Vec<Insured>, ServiceError> {
        if fragment.trim().is_empty() {
            return Err(ServiceError::InvalidArgument(
                "the identification number cannot be empty".into(),
            ));
        }
        Ok(self.store.search_by_id_fragment(fragment).await?)
    }

    /// Create a new insured.
    ///
    /// Checks run in a fixed order and the first failure wins: field
    /// shape, duplicate id, duplicate email, future birth date, age.
    ///
    /// # Errors
    ///
    /// Returns `Validation`, `Conflict` or `InvalidArgument` as above.
    pub async fn create(&self, payload: CreateInsured) -> Result<Insured, ServiceError> {
        let draft = payload.draft.normalized();
        let mut errors = match rules::validate_draft(&draft) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if payload.id.as_i64() < 1 {
            errors.push(rules::Field::Id, &rules::Violation::NotPositive);
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        let email = parse_validated_email(&draft.email)?;

        if self.store.contains(payload.id).await? {
            return Err(ServiceError::Conflict(format!(
                "an insured with identification {} already exists",
                payload.id
            )));
        }

        if self.store.email_owner(&email).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "an insured with the email {email} already exists"
            )));
        }

        rules::check_birth_date(draft.birth_date, self.clock.today())
            .map_err(|v| ServiceError::InvalidArgument(v.to_string()))?;

        let insured = Insured {
            id: payload.id,
            first_name: draft.first_name,
            middle_name: draft.middle_name,
            last_name: draft.last_name,
            second_last_name: draft.second_last_name,
            phone: draft.phone,
            email,
            birth_date: draft.birth_date,
            estimated_insured_value: draft.estimated_insured_value,
            notes: draft.notes,
            created_at: self.clock.now(),
            updated_at: None,
        };

        self.store.insert(&insured).await.map_err(ServiceError::from)?;
        Ok(insured)
    }

    /// Replace every mutable field of an existing insured.
    ///
    /// The identification number is the lookup key, never a payload
    /// field; `created_at` is carried over untouched.
    ///
    /// # Errors
    ///
    /// Returns `Validation`, `NotFound`, `Conflict` or `InvalidArgument`.
    pub async fn update(
        &self,
        id: InsuredId,
        draft: InsuredDraft,
    ) -> Result<Insured, ServiceError> {
        let draft = draft.normalized();
        rules::validate_draft(&draft).map_err(ServiceError::Validation)?;
        let email = parse_validated_email(&draft.email)?;

        let existing = self
            .store
            .fetch(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        if let Some(owner) = self.store.email_owner(&email).await?
            && owner != id
        {
            return Err(ServiceError::Conflict(format!(
                "the email {email} is already used by another insured"
            )));
        }

        rules::check_birth_date(draft.birth_date, self.clock.today())
            .map_err(|v| ServiceError::InvalidArgument(v.to_string()))?;

        let updated = Insured {
            id,
            first_name: draft.first_name,
            middle_name: draft.middle_name,
            last_name: draft.last_name,
            second_last_name: draft.second_last_name,
            phone: draft.phone,
            email,
            birth_date: draft.birth_date,
            estimated_insured_value: draft.estimated_insured_value,
            notes: draft.notes,
            created_at: existing.created_at,
            updated_at: Some(self.clock.now()),
        };

        if !self.store.replace(&updated).await.map_err(ServiceError::from)? {
            return Err(ServiceError::NotFound(id));
        }
        Ok(updated)
    }

    /// Delete an insured. A second delete of the same id is `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the id is unknown.
    pub async fn delete(&self, id: InsuredId) -> Result<(), ServiceError> {
        if self.store.remove(id).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound(id))
        }
    }

    /// Storage connectivity check for readiness probes.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if storage is unreachable.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.store.ping().await?)
    }
}

/// Parse an email out of a draft that already passed shape validation.
fn parse_validated_email(raw: &str) -> Result<Email, ServiceError> {
    Email::parse(raw).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.push_message(rules::Field::Email, e.to_string());
        ServiceError::Validation(errors)
    })
}
