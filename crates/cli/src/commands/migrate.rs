//! Database migration command.
//!
//! Applies the server crate's sqlx migrations to the registry database.
//!
//! # Environment Variables
//!
//! - `COVERBOOK_DATABASE_URL` - `PostgreSQL` connection string

use secrecy::SecretString;

use coverbook_server::store;

/// Run the registry migrations.
///
/// # Errors
///
/// Returns an error if `COVERBOOK_DATABASE_URL` is missing, the
/// connection fails, or a migration cannot be applied.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("COVERBOOK_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "COVERBOOK_DATABASE_URL not set")?;

    tracing::info!("Connecting to registry database...");
    let pool = store::create_pool(&database_url).await?;

    tracing::info!("Running registry migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Registry migrations complete!");
    Ok(())
}
