//! The insured list controller.
//!
//! Holds the current page, the search box, the delete confirmation and
//! the transient messages a list view renders. Searching with a blank
//! box restores the loaded page instead of calling the server; page
//! navigation is guarded to the known range.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use coverbook_core::{Insured, Page};

use crate::gateway::RecordGateway;

/// The insured list controller.
pub struct InsuredList<G> {
    gateway: Arc<G>,
    page: Option<Page<Insured>>,
    visible: Vec<Insured>,
    search_text: String,
    page_number: i64,
    page_size: i64,
    pending_delete: Option<Insured>,
    error_message: Option<String>,
    success_message: Option<String>,
}

impl<G: RecordGateway> InsuredList<G> {
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            page: None,
            visible: Vec::new(),
            search_text: String::new(),
            page_number: 1,
            page_size: 10,
            pending_delete: None,
            error_message: None,
            success_message: None,
        }
    }

    // ------------------------------------------------------------------
    // Loading and pagination
    // ------------------------------------------------------------------

    /// Load the current page from the registry.
    pub async fn load(&mut self) {
        self.error_message = None;
        match self.gateway.list(self.page_number, self.page_size).await {
            Ok(page) => {
                self.visible = page.data.clone();
                self.page = Some(page);
            }
            Err(error) => {
                tracing::error!(%error, "Failed to load insureds");
                self.error_message = Some(format!("Could not load the insured list: {error}"));
            }
        }
    }

    /// Navigate to `page` and reload. Out-of-range targets are ignored.
    pub async fn change_page(&mut self, page: i64) {
        let total_pages = self.page.as_ref().map_or(i64::MAX, |p| p.total_pages);
        if page < 1 || page > total_pages {
            return;
        }
        self.page_number = page;
        self.load().await;
    }

    /// The page envelope, once loaded.
    #[must_use]
    pub const fn page(&self) -> Option<&Page<Insured>> {
        self.page.as_ref()
    }

    /// The rows a view should render: the search hits while a search is
    /// active, the loaded page otherwise.
    #[must_use]
    pub fn visible(&self) -> &[Insured] {
        &self.visible
    }

    /// `1..=totalPages`, for rendering page buttons.
    #[must_use]
    pub fn page_numbers(&self) -> Vec<i64> {
        self.page
            .as_ref()
            .map_or_else(Vec::new, |p| (1..=p.total_pages).collect())
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Run the identification-number search. A blank box restores the
    /// loaded page without calling the server.
    pub async fn search(&mut self) {
        if self.search_text.trim().is_empty() {
            self.restore_page();
            return;
        }
        match self.gateway.search(&self.search_text).await {
            Ok(hits) => self.visible = hits,
            Err(error) => {
                tracing::error!(%error, "Failed to search insureds");
                self.error_message = Some("Could not search the insureds".to_owned());
            }
        }
    }

    /// Clear the search box and show the loaded page again.
    pub fn clear_search(&mut self) {
        self.search_text.clear();
        self.restore_page();
    }

    fn restore_page(&mut self) {
        self.visible = self
            .page
            .as_ref()
            .map_or_else(Vec::new, |p| p.data.clone());
    }

    // ------------------------------------------------------------------
    // Delete with confirmation
    // ------------------------------------------------------------------

    /// Ask for confirmation before deleting `insured`.
    pub fn arm_delete(&mut self, insured: Insured) {
        self.pending_delete = Some(insured);
    }

    /// The insured awaiting delete confirmation, if any.
    #[must_use]
    pub const fn pending_delete(&self) -> Option<&Insured> {
        self.pending_delete.as_ref()
    }

    /// Keep the insured; close the confirmation.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the armed insured and reload the list.
    pub async fn confirm_delete(&mut self) {
        let Some(insured) = self.pending_delete.take() else {
            return;
        };
        match self.gateway.delete(insured.id).await {
            Ok(()) => {
                self.success_message = Some("Insured deleted successfully".to_owned());
                self.load().await;
            }
            Err(error) => {
                tracing::error!(%error, id = %insured.id, "Failed to delete insured");
                self.error_message = Some("Could not delete the insured".to_owned());
            }
        }
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.success_message = None;
    }
}

// ----------------------------------------------------------------------
// Display helpers (es-CO locale, as the registry's users expect)
// ----------------------------------------------------------------------

/// "first middle last second", skipping an absent middle name.
#[must_use]
pub fn full_name(insured: &Insured) -> String {
    let mut name = insured.first_name.clone();
    if let Some(middle) = &insured.middle_name {
        name.push(' ');
        name.push_str(middle);
    }
    name.push(' ');
    name.push_str(&insured.last_name);
    name.push(' ');
    name.push_str(&insured.second_last_name);
    name
}

/// Whole-peso currency with dot thousand separators, e.g. `$ 2.500.000`.
#[must_use]
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round();
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("$ {sign}{grouped}")
}

/// Day-first date, e.g. `20/05/1990`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
