//! Typed HTTP client for the registry API.
//!
//! One method per operation. Non-2xx responses are decoded as the shared
//! [`ErrorBody`] (which carries either a single message or a per-field
//! map) and mapped by status code into the [`ApiError`] taxonomy the
//! controllers reconcile against.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use coverbook_core::{CreateInsured, ErrorBody, Insured, InsuredDraft, InsuredId, Page};

/// Errors surfaced by registry API calls.
///
/// Rule violations arrive with their payloads intact; transport and
/// server failures stay opaque. The client never retries - every failure
/// is surfaced and the user decides whether to resubmit.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400: malformed or rule-violating input.
    #[error("{}", body.summary())]
    InvalidArgument {
        /// The decoded error payload (message or field errors).
        body: ErrorBody,
    },

    /// 409: duplicate identification number or email.
    #[error("{0}")]
    Conflict(String),

    /// 404: unknown identification number.
    #[error("{0}")]
    NotFound(String),

    /// Any other non-2xx status.
    #[error("server error: {0}")]
    Server(String),

    /// The request never completed (connection, timeout, decoding).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP client for the registry service.
#[derive(Debug, Clone)]
pub struct RegistryApi {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryApi {
    /// Create a client for a registry at `base_url`
    /// (e.g. `http://localhost:5056`).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never
    /// happen under normal circumstances as we use standard TLS
    /// configuration.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        let mut base_url: String = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// One page of insureds, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on any non-2xx response or transport failure.
    pub async fn list(
        &self,
        page_number: i64,
        page_size: i64,
    ) -> Result<Page<Insured>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/insureds"))
            .query(&[("pageNumber", page_number), ("pageSize", page_size)])
            .send()
            .await?;
        decode(response).await
    }

    /// Fetch one insured by identification number.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn get(&self, id: InsuredId) -> Result<Insured, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/insureds/{id}")))
            .send()
            .await?;
        decode(response).await
    }

    /// Insureds whose identification number contains `fragment`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] for a blank fragment.
    pub async fn search(&self, fragment: &str) -> Result<Vec<Insured>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/insureds/search/{fragment}")))
            .send()
            .await?;
        decode(response).await
    }

    /// Create a new insured.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] or [`ApiError::Conflict`]
    /// when the server rejects the payload.
    pub async fn create(&self, payload: &CreateInsured) -> Result<Insured, ApiError> {
        let response = self
            .client
            .post(self.url("/api/insureds"))
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    /// Replace every mutable field of an existing insured.
    ///
    /// The id travels in the URL, never in the payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`], [`ApiError::InvalidArgument`] or
    /// [`ApiError::Conflict`] when the server rejects the update.
    pub async fn update(
        &self,
        id: InsuredId,
        draft: &InsuredDraft,
    ) -> Result<Insured, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/api/insureds/{id}")))
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    /// Delete an insured.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn delete(&self, id: InsuredId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/insureds/{id}")))
            .send()
            .await?;
        check(response).await
    }
}

/// Decode a 2xx body, or map the error payload by status.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    Err(error_from(status, response).await)
}

/// Check a response for success, discarding the body.
async fn check(response: reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(error_from(status, response).await)
}

async fn error_from(status: StatusCode, response: reqwest::Response) -> ApiError {
    let body: ErrorBody = response.json().await.unwrap_or_default();
    match status {
        StatusCode::BAD_REQUEST => ApiError::InvalidArgument { body },
        StatusCode::CONFLICT => ApiError::Conflict(body.summary()),
        StatusCode::NOT_FOUND => ApiError::NotFound(body.summary()),
        _ => ApiError::Server(body.summary()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let api = RegistryApi::new("http://localhost:5056/");
        assert_eq!(api.url("/api/insureds"), "http://localhost:5056/api/insureds");
    }

    #[test]
    fn test_invalid_argument_display_uses_body_summary() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"fieldErrors":{"firstName":["this field is required"]}}"#)
                .unwrap();
        let error = ApiError::InvalidArgument { body };
        assert_eq!(error.to_string(), "this field is required");
    }
}
