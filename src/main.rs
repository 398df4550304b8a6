//! Storefront bootstrap - provisions the database and seeds the catalog.

use dotenvy::dotenv;
use storefront::config;
use storefront::errors::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Initialize database
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 4. Seed the catalog (if a config.toml is present)
    match config::catalog::load_default_catalog() {
        Ok(catalog) => {
            let inserted = config::catalog::seed_initial_products(&db, &catalog).await?;
            info!("Catalog seed processed ({inserted} products inserted).");
        }
        Err(e) => warn!("Skipping catalog seed: {e}"),
    }

    info!("Storefront database is ready.");
    Ok(())
}
