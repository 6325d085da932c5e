//! The insured form controller.
//!
//! Collects raw input strings, applies a local mirror of the server
//! rules for immediate feedback, then delegates authoritative acceptance
//! to the registry and reconciles rejections into field-level or
//! form-level messages.
//!
//! The lifecycle is an explicit state machine - `Idle → Dirty →
//! Submitting → Succeeded | Failed` - with one enumerated phase instead
//! of independent flags, so the form cannot be simultaneously "loading"
//! and "saved". Local validation only gates submission; the server
//! re-checks everything, notably uniqueness, which a client cannot
//! verify without a round trip.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::mpsc::UnboundedSender;

use coverbook_core::{
    CreateInsured, Email, Insured, InsuredDraft, InsuredId,
    rules::{self, Field, ValidationErrors, Violation},
};

use crate::api::ApiError;
use crate::gateway::RecordGateway;

/// Message shown when the registry reports a duplicate and provides no
/// message of its own.
const CONFLICT_FALLBACK: &str = "The identification number or email is already registered";

/// Message shown for unexpected failures.
const GENERIC_ERROR: &str = "An error occurred while saving the insured, please try again";

/// How long the success message stays visible before the form asks its
/// parent to dismiss it.
const DEFAULT_DISMISS_DELAY: Duration = Duration::from_millis(1500);

/// Whether the form creates a new insured or edits an existing one.
/// Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: InsuredId },
}

/// The form lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Nothing entered yet.
    Idle,
    /// At least one field touched or modified; errors may be visible.
    Dirty,
    /// A submission is in flight; repeat submission is disabled.
    Submitting,
    /// The registry accepted the submission; the form is closing.
    Succeeded,
    /// The registry rejected the submission; still editable.
    Failed,
}

/// Notifications the form sends its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// A create/update went through; refresh the list and dismiss.
    Saved,
    /// The user closed the form without saving.
    Cancelled,
}

/// What a call to [`InsuredForm::submit`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Local validation failed; errors are now visible on every field.
    Invalid,
    /// The registry accepted the submission.
    Saved(Insured),
    /// The registry rejected the submission; messages are set.
    Rejected,
    /// A submission is already in flight or the form is closing.
    Blocked,
}

/// Per-field input state.
#[derive(Debug, Clone, Default)]
struct FieldState {
    value: String,
    touched: bool,
    modified: bool,
}

/// The insured form controller.
pub struct InsuredForm<G> {
    gateway: Arc<G>,
    events: UnboundedSender<FormEvent>,
    mode: FormMode,
    phase: FormPhase,
    fields: BTreeMap<Field, FieldState>,
    server_errors: BTreeMap<String, Vec<String>>,
    form_error: Option<String>,
    success_message: Option<String>,
    dismiss_delay: Duration,
}

impl<G: RecordGateway> InsuredForm<G> {
    /// A blank form that creates a new insured.
    #[must_use]
    pub fn create(gateway: Arc<G>, events: UnboundedSender<FormEvent>) -> Self {
        Self::new(gateway, events, FormMode::Create)
    }

    /// A form pre-filled from `insured`, in edit mode. The id field is
    /// shown read-only and is excluded from the update payload.
    #[must_use]
    pub fn edit(gateway: Arc<G>, events: UnboundedSender<FormEvent>, insured: &Insured) -> Self {
        let mut form = Self::new(gateway, events, FormMode::Edit { id: insured.id });
        form.prefill(insured);
        form
    }

    fn new(gateway: Arc<G>, events: UnboundedSender<FormEvent>, mode: FormMode) -> Self {
        let fields = Field::ALL
            .into_iter()
            .map(|field| (field, FieldState::default()))
            .collect();
        Self {
            gateway,
            events,
            mode,
            phase: FormPhase::Idle,
            fields,
            server_errors: BTreeMap::new(),
            form_error: None,
            success_message: None,
            dismiss_delay: DEFAULT_DISMISS_DELAY,
        }
    }

    /// Override the success-message display delay. Zero is clamped to
    /// the default: the message must be perceivable before dismissal.
    #[must_use]
    pub fn with_dismiss_delay(mut self, delay: Duration) -> Self {
        self.dismiss_delay = if delay.is_zero() {
            DEFAULT_DISMISS_DELAY
        } else {
            delay
        };
        self
    }

    fn prefill(&mut self, insured: &Insured) {
        let values: [(Field, String); 10] = [
            (Field::Id, insured.id.to_string()),
            (Field::FirstName, insured.first_name.clone()),
            (
                Field::MiddleName,
                insured.middle_name.clone().unwrap_or_default(),
            ),
            (Field::LastName, insured.last_name.clone()),
            (Field::SecondLastName, insured.second_last_name.clone()),
            (Field::Phone, insured.phone.clone()),
            (Field::Email, insured.email.to_string()),
            (Field::BirthDate, insured.birth_date.format("%Y-%m-%d").to_string()),
            (
                Field::EstimatedInsuredValue,
                insured.estimated_insured_value.to_string(),
            ),
            (Field::Notes, insured.notes.clone().unwrap_or_default()),
        ];
        for (field, value) in values {
            self.fields.entry(field).or_default().value = value;
        }
    }

    // ------------------------------------------------------------------
    // Field access
    // ------------------------------------------------------------------

    /// The current raw value of a field.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        self.fields
            .get(&field)
            .map_or("", |state| state.value.as_str())
    }

    /// Set a field's value. Ignored for the id field in edit mode (the
    /// identifier is immutable once assigned).
    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        if field == Field::Id && self.is_editing() {
            return;
        }
        if matches!(self.phase, FormPhase::Submitting | FormPhase::Succeeded) {
            return;
        }
        if let Some(state) = self.fields.get_mut(&field) {
            state.value = value.into();
            state.modified = true;
        }
        self.server_errors.remove(field.wire_name());
        self.phase = FormPhase::Dirty;
    }

    /// Mark a field as touched (focus left the input).
    pub fn touch(&mut self, field: Field) {
        if let Some(state) = self.fields.get_mut(&field) {
            state.touched = true;
        }
        if self.phase == FormPhase::Idle {
            self.phase = FormPhase::Dirty;
        }
    }

    /// Whether a field has been touched.
    #[must_use]
    pub fn is_touched(&self, field: Field) -> bool {
        self.fields.get(&field).is_some_and(|state| state.touched)
    }

    /// Whether a field's value has been modified.
    #[must_use]
    pub fn is_modified(&self, field: Field) -> bool {
        self.fields.get(&field).is_some_and(|state| state.modified)
    }

    /// The message to show under a field, if any.
    ///
    /// Server-reported errors show unconditionally; local violations
    /// only once the field has been touched.
    #[must_use]
    pub fn field_error(&self, field: Field) -> Option<String> {
        if let Some(messages) = self.server_errors.get(field.wire_name()) {
            return messages.first().cloned();
        }
        if !self.is_touched(field) {
            return None;
        }
        self.field_violation(field).map(|v| v.to_string())
    }

    // ------------------------------------------------------------------
    // State access
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn phase(&self) -> FormPhase {
        self.phase
    }

    #[must_use]
    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting)
    }

    /// The form-level error message, if any.
    #[must_use]
    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    /// The success message, if the last submission went through.
    #[must_use]
    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    /// Clear the form-level and server-reported messages.
    pub fn clear_messages(&mut self) {
        self.form_error = None;
        self.success_message = None;
        self.server_errors.clear();
    }

    /// Whether every field passes the local rule mirror.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate_all().is_empty()
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Submit the form.
    ///
    /// Locally invalid input never leaves the client: every field is
    /// marked touched so its message becomes visible, and the phase
    /// stays `Dirty`. A locally valid form goes to `Submitting`
    /// (repeat submissions are blocked), then `Succeeded` or `Failed`.
    /// On success the parent is sent [`FormEvent::Saved`] after the
    /// dismiss delay, so the success message is perceivable first.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if matches!(self.phase, FormPhase::Submitting | FormPhase::Succeeded) {
            return SubmitOutcome::Blocked;
        }

        let errors = self.validate_all();
        if !errors.is_empty() {
            self.touch_all();
            self.phase = FormPhase::Dirty;
            return SubmitOutcome::Invalid;
        }

        self.phase = FormPhase::Submitting;
        self.form_error = None;
        self.success_message = None;
        self.server_errors.clear();

        let draft = self.draft();
        let result = match self.mode {
            FormMode::Create => {
                let payload = CreateInsured {
                    id: InsuredId::new(self.parsed_id()),
                    draft,
                };
                self.gateway.create(payload).await
            }
            FormMode::Edit { id } => self.gateway.update(id, draft).await,
        };

        match result {
            Ok(insured) => {
                self.phase = FormPhase::Succeeded;
                self.success_message = Some(
                    if self.is_editing() {
                        "Insured updated successfully"
                    } else {
                        "Insured created successfully"
                    }
                    .to_owned(),
                );

                let events = self.events.clone();
                let delay = self.dismiss_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = events.send(FormEvent::Saved);
                });

                SubmitOutcome::Saved(insured)
            }
            Err(error) => {
                self.phase = FormPhase::Failed;
                self.apply_rejection(&error);
                SubmitOutcome::Rejected
            }
        }
    }

    /// Close the form without saving.
    pub fn cancel(&self) {
        let _ = self.events.send(FormEvent::Cancelled);
    }

    /// Translate a registry rejection into messages, by category:
    /// invalid-argument payloads surface per-field (and aggregated at
    /// form level), conflicts render the fixed already-registered
    /// message, everything else renders a generic retry message.
    fn apply_rejection(&mut self, error: &ApiError) {
        match error {
            ApiError::InvalidArgument { body } => {
                if let Some(map) = &body.field_errors {
                    self.server_errors = map.clone();
                }
                self.form_error = Some(nonblank_or(body.summary(), GENERIC_ERROR));
            }
            ApiError::Conflict(message) => {
                self.form_error = Some(nonblank_or(message.clone(), CONFLICT_FALLBACK));
            }
            ApiError::NotFound(message) => {
                self.form_error = Some(nonblank_or(message.clone(), GENERIC_ERROR));
            }
            ApiError::Server(_) | ApiError::Transport(_) => {
                self.form_error = Some(GENERIC_ERROR.to_owned());
            }
        }
    }

    // ------------------------------------------------------------------
    // Local validation mirror
    // ------------------------------------------------------------------

    fn touch_all(&mut self) {
        for state in self.fields.values_mut() {
            state.touched = true;
        }
    }

    fn validate_all(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in Field::ALL {
            if let Some(violation) = self.field_violation(field) {
                errors.push(field, &violation);
            }
        }
        errors
    }

    /// The local rule mirror for one field, over its raw input string.
    ///
    /// Same table, same age arithmetic as the server; only the
    /// input-parsing violations (unparseable number or date) are
    /// client-specific.
    fn field_violation(&self, field: Field) -> Option<Violation> {
        let raw = self.value(field).trim();
        match field {
            Field::Id => {
                if self.is_editing() {
                    return None;
                }
                if raw.is_empty() {
                    return Some(Violation::Required);
                }
                match raw.parse::<i64>() {
                    Ok(id) if id >= 1 => None,
                    Ok(_) => Some(Violation::NotPositive),
                    Err(_) => Some(Violation::NotANumber),
                }
            }
            Field::BirthDate => {
                if raw.is_empty() {
                    return Some(Violation::Required);
                }
                match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    Ok(date) => {
                        rules::check_birth_date(date, Utc::now().date_naive()).err()
                    }
                    Err(_) => Some(Violation::InvalidDate),
                }
            }
            Field::EstimatedInsuredValue => {
                if raw.is_empty() {
                    return Some(Violation::Required);
                }
                match raw.parse::<Decimal>() {
                    Ok(value) if value >= rules::minimum_insured_value() => None,
                    Ok(_) => Some(Violation::NotPositive),
                    Err(_) => Some(Violation::NotANumber),
                }
            }
            Field::Email => {
                let rule = field.text_rule()?;
                if let Err(violation) = rule.check(Some(raw)) {
                    return Some(violation);
                }
                if Email::parse(raw).is_err() {
                    return Some(Violation::InvalidEmail);
                }
                None
            }
            _ => {
                let rule = field.text_rule()?;
                rule.check(Some(raw)).err()
            }
        }
    }

    fn parsed_id(&self) -> i64 {
        // Guaranteed parseable after validate_all.
        self.value(Field::Id).trim().parse().unwrap_or_default()
    }

    /// Assemble the update payload from the raw inputs. The id is never
    /// part of it.
    fn draft(&self) -> InsuredDraft {
        InsuredDraft {
            first_name: self.value(Field::FirstName).to_owned(),
            middle_name: none_if_blank(self.value(Field::MiddleName)),
            last_name: self.value(Field::LastName).to_owned(),
            second_last_name: self.value(Field::SecondLastName).to_owned(),
            phone: self.value(Field::Phone).to_owned(),
            email: self.value(Field::Email).to_owned(),
            birth_date: NaiveDate::parse_from_str(self.value(Field::BirthDate).trim(), "%Y-%m-%d")
                .unwrap_or_default(),
            estimated_insured_value: self
                .value(Field::EstimatedInsuredValue)
                .trim()
                .parse()
                .unwrap_or_default(),
            notes: none_if_blank(self.value(Field::Notes)),
        }
    }
}

fn none_if_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn nonblank_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_owned()
    } else {
        message
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Days, TimeZone, Utc};
    use tokio::sync::mpsc;

    use coverbook_core::ErrorBody;

    use crate::gateway::stub::StubGateway;

    use super::*;

    fn sample_insured(id: i64, email: &str) -> Insured {
        Insured {
            id: InsuredId::new(id),
            first_name: "Maria".to_owned(),
            middle_name: None,
            last_name: "Gomez".to_owned(),
            second_last_name: "Rios".to_owned(),
            phone: "3001234567".to_owned(),
            email: Email::parse(email).unwrap(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 20).unwrap(),
            estimated_insured_value: Decimal::new(250_000_000, 2),
            notes: None,
            created_at: Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn fill_valid(form: &mut InsuredForm<StubGateway>) {
        form.set_value(Field::Id, "1019456789");
        form.set_value(Field::FirstName, "Maria");
        form.set_value(Field::LastName, "Gomez");
        form.set_value(Field::SecondLastName, "Rios");
        form.set_value(Field::Phone, "3001234567");
        form.set_value(Field::Email, "maria@example.com");
        form.set_value(Field::BirthDate, "1990-05-20");
        form.set_value(Field::EstimatedInsuredValue, "2500000.00");
    }

    fn create_form(
        gateway: Arc<StubGateway>,
    ) -> (InsuredForm<StubGateway>, mpsc::UnboundedReceiver<FormEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let form = InsuredForm::create(gateway, tx)
            .with_dismiss_delay(Duration::from_millis(10));
        (form, rx)
    }

    // ------------------------------------------------------------------
    // Phases
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_starts_idle_and_becomes_dirty_on_edit() {
        let (mut form, _rx) = create_form(Arc::new(StubGateway::default()));
        assert_eq!(form.phase(), FormPhase::Idle);

        form.set_value(Field::FirstName, "M");
        assert_eq!(form.phase(), FormPhase::Dirty);
        assert!(form.is_modified(Field::FirstName));
        assert!(!form.is_touched(Field::FirstName));
    }

    #[tokio::test]
    async fn test_field_errors_hidden_until_touched() {
        let (mut form, _rx) = create_form(Arc::new(StubGateway::default()));
        form.set_value(Field::FirstName, "M");
        assert_eq!(form.field_error(Field::FirstName), None);

        form.touch(Field::FirstName);
        assert_eq!(
            form.field_error(Field::FirstName),
            Some(Violation::TooShort { min: 2 }.to_string())
        );
    }

    #[tokio::test]
    async fn test_invalid_submit_touches_everything_and_stays_dirty() {
        let (mut form, _rx) = create_form(Arc::new(StubGateway::default()));
        form.set_value(Field::FirstName, "Maria");

        let outcome = form.submit().await;
        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(form.phase(), FormPhase::Dirty);
        assert!(form.is_touched(Field::Email));
        assert_eq!(
            form.field_error(Field::LastName),
            Some(Violation::Required.to_string())
        );
    }

    // ------------------------------------------------------------------
    // Local rule mirror
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_underage_birth_date_blocks_submission() {
        let (mut form, _rx) = create_form(Arc::new(StubGateway::default()));
        fill_valid(&mut form);
        let seventeen_ish = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(6205))
            .unwrap();
        form.set_value(Field::BirthDate, seventeen_ish.format("%Y-%m-%d").to_string());

        assert_eq!(form.submit().await, SubmitOutcome::Invalid);
        form.touch(Field::BirthDate);
        assert_eq!(
            form.field_error(Field::BirthDate),
            Some(Violation::Underage { min: 18 }.to_string())
        );
    }

    #[tokio::test]
    async fn test_future_birth_date_blocks_submission() {
        let (mut form, _rx) = create_form(Arc::new(StubGateway::default()));
        fill_valid(&mut form);
        let tomorrow = Utc::now()
            .date_naive()
            .checked_add_days(Days::new(1))
            .unwrap();
        form.set_value(Field::BirthDate, tomorrow.format("%Y-%m-%d").to_string());

        assert_eq!(form.submit().await, SubmitOutcome::Invalid);
    }

    #[tokio::test]
    async fn test_value_below_minimum_is_invalid() {
        let (mut form, _rx) = create_form(Arc::new(StubGateway::default()));
        fill_valid(&mut form);
        form.set_value(Field::EstimatedInsuredValue, "0");

        assert_eq!(form.submit().await, SubmitOutcome::Invalid);
        assert_eq!(
            form.field_error(Field::EstimatedInsuredValue),
            Some(Violation::NotPositive.to_string())
        );
    }

    // ------------------------------------------------------------------
    // Successful submission
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_submits_payload_and_notifies_after_delay() {
        let gateway = Arc::new(StubGateway::default());
        gateway.push_create(Ok(sample_insured(1_019_456_789, "maria@example.com")));

        let (mut form, mut rx) = create_form(gateway.clone());
        fill_valid(&mut form);

        let outcome = form.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert_eq!(form.phase(), FormPhase::Succeeded);
        assert_eq!(form.success_message(), Some("Insured created successfully"));

        // The parent is notified only after the dismiss delay.
        let event = rx.recv().await.unwrap();
        assert_eq!(event, FormEvent::Saved);

        let sent = gateway.created();
        assert_eq!(sent.len(), 1);
        let payload = sent.first().unwrap();
        assert_eq!(payload.id, InsuredId::new(1_019_456_789));
        assert_eq!(payload.draft.first_name, "Maria");
    }

    #[tokio::test]
    async fn test_repeat_submission_is_blocked_after_success() {
        let gateway = Arc::new(StubGateway::default());
        gateway.push_create(Ok(sample_insured(1, "maria@example.com")));

        let (mut form, _rx) = create_form(gateway);
        fill_valid(&mut form);

        assert!(matches!(form.submit().await, SubmitOutcome::Saved(_)));
        assert_eq!(form.submit().await, SubmitOutcome::Blocked);
    }

    #[tokio::test]
    async fn test_edit_mode_excludes_id_from_payload() {
        let gateway = Arc::new(StubGateway::default());
        let existing = sample_insured(42, "maria@example.com");
        gateway.push_update(Ok(existing.clone()));

        let (tx, _rx) = mpsc::unbounded_channel();
        let mut form = InsuredForm::edit(gateway.clone(), tx, &existing)
            .with_dismiss_delay(Duration::from_millis(10));

        assert!(form.is_editing());
        assert_eq!(form.value(Field::Id), "42");
        assert_eq!(form.value(Field::BirthDate), "1990-05-20");

        // The id field is read-only in edit mode.
        form.set_value(Field::Id, "99");
        assert_eq!(form.value(Field::Id), "42");

        form.set_value(Field::Phone, "3009999999");
        let outcome = form.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert_eq!(form.success_message(), Some("Insured updated successfully"));

        let sent = gateway.updated();
        assert_eq!(sent.len(), 1);
        let (id, draft) = sent.first().unwrap();
        assert_eq!(*id, InsuredId::new(42));
        assert_eq!(draft.phone, "3009999999");
    }

    // ------------------------------------------------------------------
    // Rejection reconciliation
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_conflict_shows_fixed_message_when_body_is_empty() {
        let gateway = Arc::new(StubGateway::default());
        gateway.push_create(Err(ApiError::Conflict(String::new())));

        let (mut form, _rx) = create_form(gateway);
        fill_valid(&mut form);

        assert_eq!(form.submit().await, SubmitOutcome::Rejected);
        assert_eq!(form.phase(), FormPhase::Failed);
        assert_eq!(form.form_error(), Some(CONFLICT_FALLBACK));

        // Still editable, and editing returns the form to Dirty.
        form.set_value(Field::Email, "other@example.com");
        assert_eq!(form.phase(), FormPhase::Dirty);
    }

    #[tokio::test]
    async fn test_conflict_prefers_server_message() {
        let gateway = Arc::new(StubGateway::default());
        gateway.push_create(Err(ApiError::Conflict(
            "an insured with the email maria@example.com already exists".to_owned(),
        )));

        let (mut form, _rx) = create_form(gateway);
        fill_valid(&mut form);

        form.submit().await;
        assert_eq!(
            form.form_error(),
            Some("an insured with the email maria@example.com already exists")
        );
    }

    #[tokio::test]
    async fn test_field_errors_payload_lands_on_fields() {
        let gateway = Arc::new(StubGateway::default());
        let mut map = BTreeMap::new();
        map.insert(
            "email".to_owned(),
            vec!["email format is not valid".to_owned()],
        );
        gateway.push_create(Err(ApiError::InvalidArgument {
            body: ErrorBody {
                message: None,
                field_errors: Some(map),
            },
        }));

        let (mut form, _rx) = create_form(gateway);
        fill_valid(&mut form);

        assert_eq!(form.submit().await, SubmitOutcome::Rejected);
        assert_eq!(
            form.field_error(Field::Email),
            Some("email format is not valid".to_owned())
        );
        assert_eq!(form.form_error(), Some("email format is not valid"));

        // Editing the field clears its server-reported error.
        form.set_value(Field::Email, "fixed@example.com");
        assert_eq!(form.field_error(Field::Email), None);
    }

    #[tokio::test]
    async fn test_unexpected_failure_shows_generic_message() {
        let gateway = Arc::new(StubGateway::default());
        gateway.push_create(Err(ApiError::Server("boom".to_owned())));

        let (mut form, _rx) = create_form(gateway);
        fill_valid(&mut form);

        form.submit().await;
        assert_eq!(form.form_error(), Some(GENERIC_ERROR));
    }

    #[tokio::test]
    async fn test_messages_are_clearable() {
        let gateway = Arc::new(StubGateway::default());
        gateway.push_create(Err(ApiError::Server("boom".to_owned())));

        let (mut form, _rx) = create_form(gateway);
        fill_valid(&mut form);
        form.submit().await;
        assert!(form.form_error().is_some());

        form.clear_messages();
        assert_eq!(form.form_error(), None);
        assert_eq!(form.success_message(), None);
    }

    #[tokio::test]
    async fn test_cancel_notifies_parent() {
        let (form, mut rx) = create_form(Arc::new(StubGateway::default()));
        form.cancel();
        assert_eq!(rx.recv().await.unwrap(), FormEvent::Cancelled);
    }
}
