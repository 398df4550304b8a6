//! Catalog seed loading from config.toml
//!
//! The storefront has no back office of its own; a TOML file seeds the
//! product catalog on first run. Seed entries whose name already exists in
//! the database are skipped, so re-running the bootstrap is harmless.

use crate::entities::{Product, product};
use crate::errors::{Error, Result};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Catalog {
    /// List of products to seed
    pub products: Vec<ProductSeed>,
}

/// Seed entry for a single product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Product display name
    pub name: String,
    /// Optional long-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price in whole won
    pub price: i64,
    /// Initial stock
    pub stock_quantity: i32,
    /// Optional category slug
    #[serde(default)]
    pub category: Option<String>,
    /// Whether the product starts out for sale
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

const fn default_is_active() -> bool {
    true
}

/// Loads a catalog seed from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or required fields are missing.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the catalog seed from the default location (./config.toml)
pub fn load_default_catalog() -> Result<Catalog> {
    load_catalog("config.toml")
}

/// Inserts every seed product whose name is not yet in the database.
/// Returns the number of products inserted.
pub async fn seed_initial_products(db: &DatabaseConnection, catalog: &Catalog) -> Result<usize> {
    let mut inserted = 0;
    let now = chrono::Utc::now();

    for seed in &catalog.products {
        let exists = Product::find()
            .filter(product::Column::Name.eq(&seed.name))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let model = product::ActiveModel {
            name: Set(seed.name.clone()),
            description: Set(seed.description.clone()),
            price: Set(seed.price),
            stock_quantity: Set(seed.stock_quantity),
            category: Set(seed.category.clone()),
            is_active: Set(seed.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        model.insert(db).await?;
        inserted += 1;
    }

    if inserted > 0 {
        info!(inserted, "seeded catalog products");
    }

    Ok(inserted)
}
