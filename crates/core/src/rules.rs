//! The canonical validation-rule table.
//!
//! Every constraint on an insured draft is defined here exactly once, as
//! data. The server's authoritative validator and the client form's
//! pre-flight checks both read this table, so the two mirrored
//! implementations cannot drift apart.
//!
//! Field-shape checks (required/length/format) live in [`validate_draft`];
//! the birth-date rules ([`check_birth_date`]) are separate because the
//! service applies them after its uniqueness checks, in a fixed order.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::insured::InsuredDraft;
use crate::types::Email;

/// Minimum age of an insured person, in whole years.
pub const MIN_AGE: i32 = 18;

/// Smallest insured value a form accepts. The stored rule is "strictly
/// positive"; forms enforce it as a concrete minimum step.
#[must_use]
pub fn minimum_insured_value() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// A form field, named by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Id,
    FirstName,
    MiddleName,
    LastName,
    SecondLastName,
    Phone,
    Email,
    BirthDate,
    EstimatedInsuredValue,
    Notes,
}

impl Field {
    /// All fields, in form order.
    pub const ALL: [Self; 10] = [
        Self::Id,
        Self::FirstName,
        Self::MiddleName,
        Self::LastName,
        Self::SecondLastName,
        Self::Phone,
        Self::Email,
        Self::BirthDate,
        Self::EstimatedInsuredValue,
        Self::Notes,
    ];

    /// The camelCase name this field has on the wire and in error payloads.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "firstName",
            Self::MiddleName => "middleName",
            Self::LastName => "lastName",
            Self::SecondLastName => "secondLastName",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::BirthDate => "birthDate",
            Self::EstimatedInsuredValue => "estimatedInsuredValue",
            Self::Notes => "notes",
        }
    }

    /// The length rule for text fields; `None` for non-text fields.
    ///
    /// This table is the single source of truth for the string bounds.
    #[must_use]
    pub const fn text_rule(self) -> Option<TextRule> {
        match self {
            Self::FirstName | Self::LastName | Self::SecondLastName => {
                Some(TextRule::required(2, 100))
            }
            Self::MiddleName => Some(TextRule::optional(100)),
            Self::Phone => Some(TextRule::required(1, 20)),
            Self::Email => Some(TextRule::required(1, Email::MAX_LENGTH)),
            Self::Notes => Some(TextRule::optional(1000)),
            Self::Id | Self::BirthDate | Self::EstimatedInsuredValue => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Required/length constraints for one text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRule {
    pub required: bool,
    pub min_chars: usize,
    pub max_chars: usize,
}

impl TextRule {
    #[must_use]
    pub const fn required(min_chars: usize, max_chars: usize) -> Self {
        Self {
            required: true,
            min_chars,
            max_chars,
        }
    }

    #[must_use]
    pub const fn optional(max_chars: usize) -> Self {
        Self {
            required: false,
            min_chars: 0,
            max_chars,
        }
    }

    /// Check a (already trimmed) value against this rule.
    ///
    /// `None` and `Some("")` both count as absent.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn check(&self, value: Option<&str>) -> Result<(), Violation> {
        let value = value.unwrap_or("");
        if value.is_empty() {
            if self.required {
                return Err(Violation::Required);
            }
            return Ok(());
        }

        let chars = value.chars().count();
        if chars < self.min_chars {
            return Err(Violation::TooShort {
                min: self.min_chars,
            });
        }
        if chars > self.max_chars {
            return Err(Violation::TooLong {
                max: self.max_chars,
            });
        }
        Ok(())
    }
}

/// A single violated constraint. The `Display` form is the user-facing
/// message, shared verbatim by server error payloads and client forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("this field is required")]
    Required,
    #[error("must be at least {min} characters")]
    TooShort { min: usize },
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email format is not valid")]
    InvalidEmail,
    #[error("must be greater than 0")]
    NotPositive,
    #[error("birth date cannot be in the future")]
    FutureBirthDate,
    #[error("the insured must be at least {min} years old")]
    Underage { min: i32 },
    #[error("enter a valid number")]
    NotANumber,
    #[error("enter a valid date")]
    InvalidDate,
}

/// Field-keyed validation messages, ordered by wire name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation against a field.
    pub fn push(&mut self, field: Field, violation: &Violation) {
        self.push_message(field, violation.to_string());
    }

    /// Record a pre-formatted message against a field.
    pub fn push_message(&mut self, field: Field, message: impl Into<String>) {
        self.0
            .entry(field.wire_name().to_owned())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&[String]> {
        self.0.get(field.wire_name()).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl From<BTreeMap<String, Vec<String>>> for ValidationErrors {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Age in whole years at `today`, by calendar-anniversary arithmetic:
/// the year difference, minus one if the birthday has not yet occurred
/// this year. A Feb 29 birthday counts as not-yet-occurred on Feb 28.
#[must_use]
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (birth_date.month(), birth_date.day()) > (today.month(), today.day()) {
        age -= 1;
    }
    age
}

/// Check the birth-date rules: not in the future, and age ≥ [`MIN_AGE`].
///
/// # Errors
///
/// Returns [`Violation::FutureBirthDate`] or [`Violation::Underage`].
pub fn check_birth_date(birth_date: NaiveDate, today: NaiveDate) -> Result<(), Violation> {
    if birth_date > today {
        return Err(Violation::FutureBirthDate);
    }
    if age_on(birth_date, today) < MIN_AGE {
        return Err(Violation::Underage { min: MIN_AGE });
    }
    Ok(())
}

/// Check that the estimated insured value is strictly positive.
///
/// # Errors
///
/// Returns [`Violation::NotPositive`].
pub fn check_insured_value(value: Decimal) -> Result<(), Violation> {
    if value <= Decimal::ZERO {
        return Err(Violation::NotPositive);
    }
    Ok(())
}

/// Validate the field shape of a draft: required/length rules for every
/// text field, email syntax, and the positive-value rule.
///
/// Birth-date rules are deliberately not part of shape validation; the
/// service applies them after its uniqueness checks (and forms run
/// [`check_birth_date`] directly).
///
/// Expects a [`InsuredDraft::normalized`] draft, so length rules apply to
/// what would actually be stored.
///
/// # Errors
///
/// Returns every shape violation, keyed by wire field name.
pub fn validate_draft(draft: &InsuredDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let text_fields: [(Field, Option<&str>); 5] = [
        (Field::FirstName, Some(draft.first_name.as_str())),
        (Field::MiddleName, draft.middle_name.as_deref()),
        (Field::LastName, Some(draft.last_name.as_str())),
        (Field::SecondLastName, Some(draft.second_last_name.as_str())),
        (Field::Phone, Some(draft.phone.as_str())),
    ];
    for (field, value) in text_fields {
        if let Some(rule) = field.text_rule()
            && let Err(violation) = rule.check(value)
        {
            errors.push(field, &violation);
        }
    }

    match Field::Email
        .text_rule()
        .map(|rule| rule.check(Some(draft.email.as_str())))
    {
        Some(Err(violation)) => errors.push(Field::Email, &violation),
        Some(Ok(())) => {
            if Email::parse(&draft.email).is_err() {
                errors.push(Field::Email, &Violation::InvalidEmail);
            }
        }
        None => {}
    }

    if let Some(rule) = Field::Notes.text_rule()
        && let Err(violation) = rule.check(draft.notes.as_deref())
    {
        errors.push(Field::Notes, &violation);
    }

    if let Err(violation) = check_insured_value(draft.estimated_insured_value) {
        errors.push(Field::EstimatedInsuredValue, &violation);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
