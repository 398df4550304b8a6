//! Order entity - One checkout attempt.
//!
//! An order is created in `Pending` status with its total already fixed
//! (product sum plus shipping fee) and is moved to `Confirmed` exactly once
//! by the payment confirmation flow. Orders are never deleted. The shipping
//! address is persisted as an embedded JSON document so the order keeps the
//! address it was placed with.

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an order.
///
/// Status changes must go through [`OrderStatus::can_transition_to`]; the
/// only transition this crate performs is `Pending -> Confirmed`, the rest of
/// the lifecycle belongs to fulfillment tooling outside this core.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created at checkout, awaiting payment confirmation
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Payment confirmed by the gateway
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Handed to the carrier
    #[sea_orm(string_value = "shipped")]
    Shipped,
    /// Delivered to the recipient
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Cancelled before fulfillment
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Stable machine-readable form, identical to the stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label for order history displays.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "awaiting payment",
            Self::Confirmed => "payment completed",
            Self::Shipped => "shipping",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Shipped)
                | (Self::Shipped, Self::Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shipping destination captured at checkout, stored as a JSON document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ShippingAddress {
    /// Recipient full name
    pub recipient_name: String,
    /// Mobile number in `010-XXXX-XXXX` form
    pub phone: String,
    /// Five-digit postal code
    pub postal_code: String,
    /// Base address
    pub address: String,
    /// Detail address (unit, floor, ...)
    pub address_detail: String,
}

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity of the buyer
    #[sea_orm(indexed)]
    pub user_id: String,
    /// Product sum plus shipping fee, in whole won
    pub total_amount: i64,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// Destination captured at checkout
    #[sea_orm(column_type = "Json")]
    pub shipping_address: ShippingAddress,
    /// Optional note from the buyer
    #[sea_orm(nullable)]
    pub order_note: Option<String>,
    /// When the order was created
    pub created_at: DateTimeUtc,
    /// When the order last changed status
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many snapshot lines
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
