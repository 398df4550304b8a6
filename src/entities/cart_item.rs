//! Cart item entity - One line of a user's cart.
//!
//! A cart holds at most one line per (`user_id`, `product_id`) pair; repeat
//! adds increment the existing line's quantity instead of inserting. The pair
//! uniqueness is enforced by the add path in `core::cart`, not by a composite
//! database constraint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    /// Unique identifier for the cart line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity of the cart owner
    #[sea_orm(indexed)]
    pub user_id: String,
    /// ID of the product in this line
    pub product_id: i64,
    /// Requested quantity, always >= 1
    pub quantity: i32,
    /// When the line was first added
    pub created_at: DateTimeUtc,
    /// When the quantity was last changed
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between CartItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cart line references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
