//! Order business logic - creation, lookup, and paginated history.
//!
//! Order creation re-validates the selected cart lines against live product
//! data, fixes the total (product sum plus shipping fee), and persists the
//! header together with one snapshot line per cart line inside a single
//! database transaction, so a failed line insert can never leave an orphaned
//! header behind. Read paths are always scoped to the calling identity.

use crate::{
    core::shipping,
    entities::{CartItem, Order, OrderItem, Product, cart_item, order, order_item},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Orders shown per history page.
pub const ORDERS_PER_PAGE: u64 = 10;

/// Maximum length of the optional order note.
pub const ORDER_NOTE_MAX_LENGTH: usize = 200;

const RECIPIENT_NAME_MIN: usize = 2;
const RECIPIENT_NAME_MAX: usize = 50;
const ADDRESS_MIN: usize = 5;
const ADDRESS_MAX: usize = 200;
const ADDRESS_DETAIL_MIN: usize = 2;
const ADDRESS_DETAIL_MAX: usize = 200;

/// Sort keys accepted by [`get_user_orders`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderSort {
    /// Newest orders first (default)
    #[default]
    Latest,
    /// Oldest orders first
    Oldest,
    /// Largest totals first
    PriceHigh,
    /// Smallest totals first
    PriceLow,
}

/// One page of a user's order history.
#[derive(Clone, Debug)]
pub struct OrderPage {
    /// The orders on this page
    pub orders: Vec<order::Model>,
    /// 1-based page number that was fetched
    pub page: u64,
    /// Total orders matching the filter
    pub total_items: u64,
    /// Total pages at [`ORDERS_PER_PAGE`]
    pub total_pages: u64,
}

/// An order header together with its snapshot lines.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderWithItems {
    /// The order header
    pub order: order::Model,
    /// Snapshot lines in insertion order
    pub items: Vec<order_item::Model>,
}

fn require_identity(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::MissingIdentity);
    }
    Ok(())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn is_valid_phone(phone: &str) -> bool {
    // 010-XXX-XXXX or 010-XXXX-XXXX
    let mut parts = phone.split('-');
    let (Some(prefix), Some(middle), Some(last), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    prefix == "010"
        && (middle.len() == 3 || middle.len() == 4)
        && middle.chars().all(|c| c.is_ascii_digit())
        && last.len() == 4
        && last.chars().all(|c| c.is_ascii_digit())
}

fn is_valid_postal_code(code: &str) -> bool {
    code.len() == 5 && code.chars().all(|c| c.is_ascii_digit())
}

/// Validates a shipping address against the checkout form rules.
pub fn validate_shipping_address(address: &order::ShippingAddress) -> Result<()> {
    let name_len = char_len(address.recipient_name.trim());
    if !(RECIPIENT_NAME_MIN..=RECIPIENT_NAME_MAX).contains(&name_len) {
        return Err(Error::Validation {
            message: format!(
                "recipient name must be {RECIPIENT_NAME_MIN}-{RECIPIENT_NAME_MAX} characters"
            ),
        });
    }
    if !is_valid_phone(&address.phone) {
        return Err(Error::Validation {
            message: "phone must match 010-0000-0000".to_string(),
        });
    }
    if !is_valid_postal_code(&address.postal_code) {
        return Err(Error::Validation {
            message: "postal code must be 5 digits".to_string(),
        });
    }
    let address_len = char_len(address.address.trim());
    if !(ADDRESS_MIN..=ADDRESS_MAX).contains(&address_len) {
        return Err(Error::Validation {
            message: format!("address must be {ADDRESS_MIN}-{ADDRESS_MAX} characters"),
        });
    }
    let detail_len = char_len(address.address_detail.trim());
    if !(ADDRESS_DETAIL_MIN..=ADDRESS_DETAIL_MAX).contains(&detail_len) {
        return Err(Error::Validation {
            message: format!(
                "address detail must be {ADDRESS_DETAIL_MIN}-{ADDRESS_DETAIL_MAX} characters"
            ),
        });
    }
    Ok(())
}

/// Creates an order from a set of the caller's cart lines.
///
/// Re-validates every selected line against the live product row (active
/// flag, stock ceiling), computes the total as product sum plus shipping
/// fee, and persists the header in `Pending` status together with one
/// name/price snapshot line per cart line. Header and lines are written in
/// one transaction. The cart lines themselves are kept; they are cleared
/// after payment confirmation.
pub async fn create_order(
    db: &DatabaseConnection,
    user_id: &str,
    cart_item_ids: &[i64],
    shipping_address: order::ShippingAddress,
    order_note: Option<String>,
) -> Result<order::Model> {
    require_identity(user_id)?;

    if cart_item_ids.is_empty() {
        return Err(Error::EmptySelection);
    }

    validate_shipping_address(&shipping_address)?;

    if let Some(note) = &order_note {
        if char_len(note) > ORDER_NOTE_MAX_LENGTH {
            return Err(Error::Validation {
                message: format!("order note must be at most {ORDER_NOTE_MAX_LENGTH} characters"),
            });
        }
    }

    let lines = CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .filter(cart_item::Column::Id.is_in(cart_item_ids.iter().copied()))
        .find_also_related(Product)
        .all(db)
        .await?;

    if lines.is_empty() {
        return Err(Error::Validation {
            message: "selected cart items were not found".to_string(),
        });
    }

    // Validate every line against the live product row, reporting the
    // offending product by name.
    let mut validated = Vec::with_capacity(lines.len());
    for (line, product) in lines {
        let product = product.ok_or(Error::ProductNotFound {
            id: line.product_id,
        })?;

        if !product.is_active {
            return Err(Error::ProductInactive { name: product.name });
        }

        if product.stock_quantity < line.quantity {
            return Err(Error::InsufficientStock {
                name: product.name,
                available: product.stock_quantity,
            });
        }

        validated.push((line, product));
    }

    let total_product_price: i64 = validated
        .iter()
        .map(|(line, product)| product.price * i64::from(line.quantity))
        .sum();
    let shipping_fee = shipping::shipping_fee(total_product_price);
    let total_amount = total_product_price + shipping_fee;

    let now = chrono::Utc::now();

    // Header and snapshot lines commit together or not at all.
    let txn = db.begin().await?;

    let order = order::ActiveModel {
        user_id: Set(user_id.to_string()),
        total_amount: Set(total_amount),
        status: Set(order::OrderStatus::Pending),
        shipping_address: Set(shipping_address),
        order_note: Set(order_note),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let order = order.insert(&txn).await?;

    let items: Vec<order_item::ActiveModel> = validated
        .iter()
        .map(|(line, product)| order_item::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(product.id),
            product_name: Set(product.name.clone()),
            quantity: Set(line.quantity),
            price: Set(product.price),
            created_at: Set(now),
            ..Default::default()
        })
        .collect();
    OrderItem::insert_many(items).exec(&txn).await?;

    txn.commit().await?;

    info!(
        order_id = order.id,
        total_amount, shipping_fee, "order created"
    );

    Ok(order)
}

/// Retrieves one of the caller's orders by id.
pub async fn get_order(
    db: &DatabaseConnection,
    user_id: &str,
    order_id: i64,
) -> Result<order::Model> {
    require_identity(user_id)?;

    Order::find_by_id(order_id)
        .filter(order::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })
}

/// Retrieves one of the caller's orders together with its snapshot lines.
pub async fn get_order_with_items(
    db: &DatabaseConnection,
    user_id: &str,
    order_id: i64,
) -> Result<OrderWithItems> {
    let order = get_order(db, user_id, order_id).await?;

    let items = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .order_by_asc(order_item::Column::Id)
        .all(db)
        .await?;

    Ok(OrderWithItems { order, items })
}

/// Retrieves one page of the caller's order history.
///
/// `page` is 1-based; pages hold [`ORDERS_PER_PAGE`] orders. An optional
/// status filter narrows the history, and `sort` picks the ordering key.
pub async fn get_user_orders(
    db: &DatabaseConnection,
    user_id: &str,
    status: Option<order::OrderStatus>,
    sort: OrderSort,
    page: u64,
) -> Result<OrderPage> {
    require_identity(user_id)?;

    let page = page.max(1);

    let mut query = Order::find().filter(order::Column::UserId.eq(user_id));
    if let Some(status) = status {
        query = query.filter(order::Column::Status.eq(status));
    }

    let query = match sort {
        OrderSort::Latest => query.order_by_desc(order::Column::CreatedAt),
        OrderSort::Oldest => query.order_by_asc(order::Column::CreatedAt),
        OrderSort::PriceHigh => query.order_by_desc(order::Column::TotalAmount),
        OrderSort::PriceLow => query.order_by_asc(order::Column::TotalAmount),
    };

    let paginator = query.paginate(db, ORDERS_PER_PAGE);
    let totals = paginator.num_items_and_pages().await?;
    let orders = paginator.fetch_page(page - 1).await?;

    Ok(OrderPage {
        orders,
        page,
        total_items: totals.number_of_items,
        total_pages: totals.number_of_pages,
    })
}
