//! Seed the registry with demo insureds.
//!
//! Seeding goes through the real [`InsuredService`], so every rule the
//! API enforces applies to seeded data too - a demo insured that would
//! be rejected over HTTP is rejected here. Existing ids/emails are
//! skipped, making the command safe to re-run.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use secrecy::SecretString;

use coverbook_core::{CreateInsured, InsuredDraft, InsuredId};
use coverbook_server::clock::SystemClock;
use coverbook_server::service::{InsuredService, ServiceError};
use coverbook_server::store::{self, InsuredStore, MemoryStore, PgStore};

/// First identification number of the seeded block.
const BASE_ID: i64 = 1_000_000_001;

const FIRST_NAMES: [&str; 5] = ["Maria", "Carlos", "Lucia", "Andres", "Paula"];
const LAST_NAMES: [&str; 5] = ["Gomez", "Rodriguez", "Martinez", "Lopez", "Castro"];
const SECOND_LAST_NAMES: [&str; 5] = ["Rios", "Vargas", "Suarez", "Pineda", "Molina"];

/// Seed `count` demo insureds.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a create fails
/// for anything other than an already-existing id/email.
pub async fn run(count: usize, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let store: Arc<dyn InsuredStore> = if dry_run {
        tracing::info!("Dry run: seeding an in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        let database_url = std::env::var("COVERBOOK_DATABASE_URL")
            .map(SecretString::from)
            .map_err(|_| "COVERBOOK_DATABASE_URL not set")?;
        let pool = store::create_pool(&database_url).await?;
        Arc::new(PgStore::new(pool))
    };

    let service = InsuredService::new(store, Arc::new(SystemClock));

    let mut created = 0_usize;
    let mut skipped = 0_usize;
    for payload in demo_insureds(count) {
        let id = payload.id;
        match service.create(payload).await {
            Ok(insured) => {
                created += 1;
                tracing::info!(id = %insured.id, email = %insured.email, "Seeded insured");
            }
            Err(ServiceError::Conflict(message)) => {
                skipped += 1;
                tracing::warn!(%id, %message, "Skipping existing insured");
            }
            Err(error) => return Err(error.into()),
        }
    }

    tracing::info!(created, skipped, "Seeding complete");
    Ok(())
}

/// Deterministic demo payloads: adult birth dates, unique ids and
/// emails, positive values.
fn demo_insureds(count: usize) -> Vec<CreateInsured> {
    (0..count)
        .map(|i| {
            let first = FIRST_NAMES[i % FIRST_NAMES.len()];
            let last = LAST_NAMES[i % LAST_NAMES.len()];
            let second = SECOND_LAST_NAMES[(i / LAST_NAMES.len()) % SECOND_LAST_NAMES.len()];
            let id = BASE_ID + i64::try_from(i).unwrap_or(0);

            let year = 1960 + i32::try_from(i % 40).unwrap_or(0);
            let month = u32::try_from(1 + (i % 12)).unwrap_or(1);
            let day = u32::try_from(1 + (i % 28)).unwrap_or(1);
            let birth_date =
                NaiveDate::from_ymd_opt(year, month, day).expect("valid demo birth date");

            CreateInsured {
                id: InsuredId::new(id),
                draft: InsuredDraft {
                    first_name: first.to_owned(),
                    middle_name: (i % 3 == 0).then(|| "Alejandra".to_owned()),
                    last_name: last.to_owned(),
                    second_last_name: second.to_owned(),
                    phone: format!("30012345{:02}", i % 100),
                    email: format!("{}.{}.{id}@example.com", first.to_lowercase(), last.to_lowercase()),
                    birth_date,
                    estimated_insured_value: Decimal::new(
                        50_000_000 + i64::try_from(i).unwrap_or(0) * 1_250_000,
                        2,
                    ),
                    notes: (i % 4 == 0).then(|| "Seeded demo record".to_owned()),
                },
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coverbook_core::rules;

    use super::*;

    #[test]
    fn test_demo_insureds_are_unique_and_valid() {
        let payloads = demo_insureds(50);
        assert_eq!(payloads.len(), 50);

        let mut ids: Vec<i64> = payloads.iter().map(|p| p.id.as_i64()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 50);

        let mut emails: Vec<&str> = payloads.iter().map(|p| p.draft.email.as_str()).collect();
        emails.sort_unstable();
        emails.dedup();
        assert_eq!(emails.len(), 50);

        for payload in &payloads {
            let draft = payload.draft.normalized();
            assert!(rules::validate_draft(&draft).is_ok());
        }
    }
}
