//! Product entity - Represents the sellable catalog.
//!
//! Products are created and edited by an external back office; this core
//! treats them as read-only except for the stock decrement performed when a
//! payment is confirmed. Prices are stored in whole won.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the product
    pub name: String,
    /// Optional long-form description
    #[sea_orm(nullable)]
    pub description: Option<String>,
    /// Unit price in whole currency units (won)
    pub price: i64,
    /// Units currently in stock
    pub stock_quantity: i32,
    /// Optional category slug (e.g. "electronics", "books")
    #[sea_orm(nullable)]
    pub category: Option<String>,
    /// Whether the product is currently for sale
    pub is_active: bool,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product appears in many cart lines
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
    /// One product appears in many order lines
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
