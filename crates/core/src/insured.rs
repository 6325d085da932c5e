//! The insured person entity and its unvalidated draft form.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Email, InsuredId};

/// An insured person as stored in the registry.
///
/// Instances are only constructed by the service after validation, so a
/// value of this type always satisfies the registry invariants: trimmed
/// strings, lowercased unique email, adult birth date, positive insured
/// value. `created_at` is stamped once at creation; `updated_at` stays
/// `None` until the first update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insured {
    pub id: InsuredId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub second_last_name: String,
    pub phone: String,
    pub email: Email,
    pub birth_date: NaiveDate,
    pub estimated_insured_value: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Insured {
    /// The mutable field set of this record, as an update payload.
    #[must_use]
    pub fn into_draft(self) -> InsuredDraft {
        InsuredDraft {
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            second_last_name: self.second_last_name,
            phone: self.phone,
            email: self.email.into_inner(),
            birth_date: self.birth_date,
            estimated_insured_value: self.estimated_insured_value,
            notes: self.notes,
        }
    }
}

/// The mutable field set of an insured, before validation.
///
/// This is the update payload on the wire (creates add the id, see
/// [`crate::api::CreateInsured`]). The email is a plain string here;
/// it becomes an [`Email`] only once the service has validated the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuredDraft {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub second_last_name: String,
    pub phone: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub estimated_insured_value: Decimal,
    pub notes: Option<String>,
}

impl InsuredDraft {
    /// Returns the draft with every string trimmed and the email
    /// lowercased. Optional fields that trim to empty become `None`.
    ///
    /// Normalization runs before validation, so length rules apply to
    /// what would actually be stored.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_owned(),
            middle_name: normalize_optional(self.middle_name.as_deref()),
            last_name: self.last_name.trim().to_owned(),
            second_last_name: self.second_last_name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            email: self.email.trim().to_lowercase(),
            birth_date: self.birth_date,
            estimated_insured_value: self.estimated_insured_value,
            notes: normalize_optional(self.notes.as_deref()),
        }
    }
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        None | Some("") => None,
        Some(v) => Some(v.to_owned()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> InsuredDraft {
        InsuredDraft {
            first_name: "  Maria ".to_owned(),
            middle_name: Some("   ".to_owned()),
            last_name: "Gomez".to_owned(),
            second_last_name: " Rios ".to_owned(),
            phone: " 3001234567 ".to_owned(),
            email: " Maria.Gomez@Example.COM ".to_owned(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 20).unwrap(),
            estimated_insured_value: Decimal::new(250_000, 2),
            notes: None,
        }
    }

    #[test]
    fn test_normalized_trims_and_lowercases() {
        let n = draft().normalized();
        assert_eq!(n.first_name, "Maria");
        assert_eq!(n.second_last_name, "Rios");
        assert_eq!(n.phone, "3001234567");
        assert_eq!(n.email, "maria.gomez@example.com");
    }

    #[test]
    fn test_normalized_blanks_optional_fields() {
        let n = draft().normalized();
        assert_eq!(n.middle_name, None);
        assert_eq!(n.notes, None);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = serde_json::to_value(draft()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("firstName"));
        assert!(obj.contains_key("secondLastName"));
        assert!(obj.contains_key("estimatedInsuredValue"));
        assert!(obj.contains_key("birthDate"));
    }
}
