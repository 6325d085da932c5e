//! Wire DTOs shared by the server and the client.
//!
//! Both sides of the HTTP boundary serialize these exact types, so the
//! request/response contract lives in one place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::insured::InsuredDraft;
use crate::rules::ValidationErrors;
use crate::types::InsuredId;

/// Payload for creating an insured: the caller-assigned id plus the
/// mutable field set. Updates send the draft alone; the id travels in
/// the URL and is never part of an update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInsured {
    pub id: InsuredId,
    #[serde(flatten)]
    pub draft: InsuredDraft,
}

/// The error payload of every non-2xx response.
///
/// Carries either a single form-level `message` or a per-field map of
/// messages; clients must handle both. The `errors` alias accepts the
/// field-map key emitted by the registry's previous implementation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        default,
        rename = "fieldErrors",
        alias = "errors",
        skip_serializing_if = "Option::is_none"
    )]
    pub field_errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorBody {
    /// A form-level message body.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            field_errors: None,
        }
    }

    /// A per-field error body.
    #[must_use]
    pub fn field_errors(errors: ValidationErrors) -> Self {
        Self {
            message: None,
            field_errors: Some(errors.into_inner()),
        }
    }

    /// Collapse the body into one displayable line: the message if
    /// present, otherwise every field message joined with ", ".
    #[must_use]
    pub fn summary(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        self.field_errors
            .iter()
            .flatten()
            .flat_map(|(_, messages)| messages.iter().cloned())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_payload_flattens_draft() {
        let json = serde_json::json!({
            "id": 123,
            "firstName": "Maria",
            "middleName": null,
            "lastName": "Gomez",
            "secondLastName": "Rios",
            "phone": "3001234567",
            "email": "maria@example.com",
            "birthDate": "1990-05-20",
            "estimatedInsuredValue": "2500.00",
            "notes": null
        });
        let payload: CreateInsured = serde_json::from_value(json).unwrap();
        assert_eq!(payload.id, InsuredId::new(123));
        assert_eq!(payload.draft.first_name, "Maria");
    }

    #[test]
    fn test_error_body_accepts_message_shape() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"already registered"}"#).unwrap();
        assert_eq!(body.summary(), "already registered");
    }

    #[test]
    fn test_error_body_accepts_field_errors_shape() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"fieldErrors":{"firstName":["this field is required"]}}"#,
        )
        .unwrap();
        assert_eq!(body.summary(), "this field is required");
    }

    #[test]
    fn test_error_body_accepts_legacy_errors_key() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"errors":{"email":["email format is not valid"]}}"#)
                .unwrap();
        assert!(body.field_errors.is_some());
    }
}
