//! Test harness for Coverbook end-to-end tests.
//!
//! [`spawn_registry`] boots the real server router (the same one the
//! binary serves) on an ephemeral loopback port, backed by the
//! in-memory store, and returns its base URL. Tests then drive it with
//! the real `RegistryApi` client or raw reqwest calls.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use coverbook_core::{CreateInsured, InsuredDraft, InsuredId};
use coverbook_server::clock::SystemClock;
use coverbook_server::config::ServerConfig;
use coverbook_server::service::InsuredService;
use coverbook_server::state::AppState;
use coverbook_server::store::MemoryStore;

/// Boot a registry on `127.0.0.1:0` and return its base URL.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn_registry() -> String {
    let service = InsuredService::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock));
    let state = AppState::new(ServerConfig::for_tests(), service);
    let app = coverbook_server::app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    format!("http://{addr}")
}

/// A valid draft for `email`.
#[must_use]
pub fn valid_draft(email: &str) -> InsuredDraft {
    InsuredDraft {
        first_name: "Maria".to_owned(),
        middle_name: None,
        last_name: "Gomez".to_owned(),
        second_last_name: "Rios".to_owned(),
        phone: "3001234567".to_owned(),
        email: email.to_owned(),
        birth_date: NaiveDate::from_ymd_opt(1990, 5, 20).expect("valid date"),
        estimated_insured_value: Decimal::new(250_000_000, 2),
        notes: None,
    }
}

/// A valid create payload for `id`/`email`.
#[must_use]
pub fn valid_payload(id: i64, email: &str) -> CreateInsured {
    CreateInsured {
        id: InsuredId::new(id),
        draft: valid_draft(email),
    }
}
