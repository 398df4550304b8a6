//! Cart business logic - Handles all cart line operations.
//!
//! Every operation is scoped to the calling identity; a caller can never see
//! or mutate another user's lines. Stock ceilings are checked against the
//! live product row at call time. Reads join the current product data for
//! display; the durable snapshot is only taken at order creation.

use crate::{
    entities::{CartItem, Product, cart_item, product},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};

/// A cart line joined with the live product row for display.
///
/// `product` is `None` when the product row has been removed from the catalog
/// since the line was added.
pub type CartLine = (cart_item::Model, Option<product::Model>);

fn require_identity(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::MissingIdentity);
    }
    Ok(())
}

/// Adds a product to the caller's cart.
///
/// Increments the existing line when the product is already in the cart,
/// inserts a new line otherwise. The resulting line quantity may never exceed
/// the product's current stock; on rejection nothing is written.
pub async fn add_to_cart(
    db: &DatabaseConnection,
    user_id: &str,
    product_id: i64,
    quantity: i32,
) -> Result<cart_item::Model> {
    require_identity(user_id)?;

    if quantity < 1 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let product = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if !product.is_active {
        return Err(Error::ProductInactive { name: product.name });
    }

    let existing = CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .filter(cart_item::Column::ProductId.eq(product_id))
        .one(db)
        .await?;

    let now = chrono::Utc::now();

    if let Some(line) = existing {
        let new_quantity = line.quantity + quantity;
        if new_quantity > product.stock_quantity {
            return Err(Error::InsufficientStock {
                name: product.name,
                available: product.stock_quantity,
            });
        }

        let mut line: cart_item::ActiveModel = line.into();
        line.quantity = Set(new_quantity);
        line.updated_at = Set(now);
        line.update(db).await.map_err(Into::into)
    } else {
        if quantity > product.stock_quantity {
            return Err(Error::InsufficientStock {
                name: product.name,
                available: product.stock_quantity,
            });
        }

        let line = cart_item::ActiveModel {
            user_id: Set(user_id.to_string()),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        line.insert(db).await.map_err(Into::into)
    }
}

/// Retrieves the caller's cart lines joined with live product data,
/// newest line first.
pub async fn get_cart_items(db: &DatabaseConnection, user_id: &str) -> Result<Vec<CartLine>> {
    require_identity(user_id)?;

    CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .find_also_related(Product)
        .order_by_desc(cart_item::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the number of lines in the caller's cart (navbar badge).
pub async fn get_cart_count(db: &DatabaseConnection, user_id: &str) -> Result<u64> {
    require_identity(user_id)?;

    CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Sets the quantity of one of the caller's cart lines.
///
/// Rejects quantities below 1, lines the caller does not own, inactive
/// products, and quantities above current stock. The stored quantity is left
/// untouched on rejection.
pub async fn update_cart_item_quantity(
    db: &DatabaseConnection,
    user_id: &str,
    cart_item_id: i64,
    quantity: i32,
) -> Result<cart_item::Model> {
    require_identity(user_id)?;

    if quantity < 1 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let line = CartItem::find_by_id(cart_item_id)
        .filter(cart_item::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::CartItemNotFound { id: cart_item_id })?;

    let product = Product::find_by_id(line.product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound {
            id: line.product_id,
        })?;

    if !product.is_active {
        return Err(Error::ProductInactive { name: product.name });
    }

    if quantity > product.stock_quantity {
        return Err(Error::InsufficientStock {
            name: product.name,
            available: product.stock_quantity,
        });
    }

    let mut line: cart_item::ActiveModel = line.into();
    line.quantity = Set(quantity);
    line.updated_at = Set(chrono::Utc::now());
    line.update(db).await.map_err(Into::into)
}

/// Removes one of the caller's cart lines.
pub async fn remove_cart_item(
    db: &DatabaseConnection,
    user_id: &str,
    cart_item_id: i64,
) -> Result<()> {
    require_identity(user_id)?;

    let result = CartItem::delete_many()
        .filter(cart_item::Column::Id.eq(cart_item_id))
        .filter(cart_item::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::CartItemNotFound { id: cart_item_id });
    }
    Ok(())
}

/// Removes a set of the caller's cart lines, returning how many were deleted.
///
/// Ids that do not exist or belong to another user are skipped silently,
/// matching the bulk-delete semantics of the cart page.
pub async fn remove_cart_items(
    db: &DatabaseConnection,
    user_id: &str,
    cart_item_ids: &[i64],
) -> Result<u64> {
    require_identity(user_id)?;

    if cart_item_ids.is_empty() {
        return Ok(0);
    }

    let result = CartItem::delete_many()
        .filter(cart_item::Column::Id.is_in(cart_item_ids.iter().copied()))
        .filter(cart_item::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Removes every line in the caller's cart, returning how many were deleted.
pub async fn clear_cart(db: &DatabaseConnection, user_id: &str) -> Result<u64> {
    require_identity(user_id)?;

    let result = CartItem::delete_many()
        .filter(cart_item::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
