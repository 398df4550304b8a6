//! Product catalog read paths.
//!
//! The catalog is maintained by an external back office; this module only
//! reads it. All listing paths hide inactive products and order by creation
//! time, newest first, matching the storefront display.

use crate::{
    entities::{Product, product},
    errors::Result,
};
use sea_orm::{QueryOrder, QuerySelect, prelude::*};

/// How many products count as "popular" on the landing page.
pub const POPULAR_PRODUCT_LIMIT: u64 = 8;

/// Retrieves all active products, newest first.
pub async fn get_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsActive.eq(true))
        .order_by_desc(product::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves active products in one category, newest first.
pub async fn get_products_by_category(
    db: &DatabaseConnection,
    category: &str,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsActive.eq(true))
        .filter(product::Column::Category.eq(category))
        .order_by_desc(product::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the landing-page "popular" selection.
///
/// Popularity is approximated by recency until sales metrics exist, so this
/// is simply the newest [`POPULAR_PRODUCT_LIMIT`] active products.
pub async fn get_popular_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsActive.eq(true))
        .order_by_desc(product::Column::CreatedAt)
        .limit(POPULAR_PRODUCT_LIMIT)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a single product by its unique ID, active or not.
///
/// Callers that care about availability (cart, checkout) check `is_active`
/// themselves so they can report the product by name.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_custom_product, create_test_product, setup_test_db};

    #[tokio::test]
    async fn test_get_products_hides_inactive() -> Result<()> {
        let db = setup_test_db().await?;

        let active = create_test_product(&db, "Keyboard").await?;
        create_custom_product(&db, "Ghost", 5_000, 3, Some("electronics"), false).await?;

        let products = get_products(&db).await?;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, active.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_products_by_category() -> Result<()> {
        let db = setup_test_db().await?;

        let book = create_custom_product(&db, "Novel", 12_000, 5, Some("books"), true).await?;
        create_custom_product(&db, "Mouse", 30_000, 5, Some("electronics"), true).await?;
        create_custom_product(&db, "Textbook", 40_000, 5, Some("books"), false).await?;

        let books = get_products_by_category(&db, "books").await?;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, book.id);

        let food = get_products_by_category(&db, "food").await?;
        assert!(food.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_popular_products_is_capped() -> Result<()> {
        let db = setup_test_db().await?;

        for i in 0..10 {
            create_test_product(&db, &format!("Product {i}")).await?;
        }

        let popular = get_popular_products(&db).await?;
        assert_eq!(popular.len(), usize::try_from(POPULAR_PRODUCT_LIMIT).unwrap());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_by_id() -> Result<()> {
        let db = setup_test_db().await?;

        let product = create_test_product(&db, "Lamp").await?;

        let found = get_product_by_id(&db, product.id).await?;
        assert_eq!(found.unwrap().name, "Lamp");

        let missing = get_product_by_id(&db, 999).await?;
        assert!(missing.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_by_id_returns_inactive_rows() -> Result<()> {
        let db = setup_test_db().await?;

        let retired = create_custom_product(&db, "Retired", 9_000, 0, None, false).await?;

        let found = get_product_by_id(&db, retired.id).await?;
        assert!(found.is_some());
        assert!(!found.unwrap().is_active);

        Ok(())
    }
}
