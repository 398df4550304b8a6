//! Shared test utilities for the storefront crate.
//!
//! This module provides common helper functions for setting up test
//! databases, creating test entities with sensible defaults, and stubbing
//! the payment gateway.

use crate::{
    entities::{order, product},
    errors::{Error, Result},
    gateway::{ConfirmPayment, ConfirmRequest, PaymentResponse, PaymentStatus},
};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `price`: 10,000
/// * `stock_quantity`: 10
/// * `category`: None
/// * `is_active`: true
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<product::Model> {
    create_custom_product(db, name, 10_000, 10, None, true).await
}

/// Creates a test product with custom parameters.
/// Use this when a test needs a specific price, stock, or active state.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    price: i64,
    stock_quantity: i32,
    category: Option<&str>,
    is_active: bool,
) -> Result<product::Model> {
    let now = chrono::Utc::now();
    let model = product::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(price),
        stock_quantity: Set(stock_quantity),
        category: Set(category.map(str::to_string)),
        is_active: Set(is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// A shipping address that passes checkout validation.
#[must_use]
pub fn test_address() -> order::ShippingAddress {
    order::ShippingAddress {
        recipient_name: "Jamie Kim".to_string(),
        phone: "010-1234-5678".to_string(),
        postal_code: "06236".to_string(),
        address: "123 Teheran-ro, Gangnam-gu, Seoul".to_string(),
        address_detail: "Apt 501".to_string(),
    }
}

/// Inserts an order row directly, bypassing checkout.
/// Used by read-path and payment tests that need orders in arbitrary states.
pub async fn insert_test_order(
    db: &DatabaseConnection,
    user_id: &str,
    total_amount: i64,
    status: order::OrderStatus,
) -> Result<order::Model> {
    let now = chrono::Utc::now();
    let model = order::ActiveModel {
        user_id: Set(user_id.to_string()),
        total_amount: Set(total_amount),
        status: Set(status),
        shipping_address: Set(test_address()),
        order_note: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Gateway stub that answers every confirmation with a fixed status.
#[derive(Clone, Debug)]
pub struct StubGateway {
    /// Status reported back for every confirmation
    pub status: PaymentStatus,
}

impl StubGateway {
    /// A gateway that completes every charge.
    #[must_use]
    pub const fn done() -> Self {
        Self::with_status(PaymentStatus::Done)
    }

    /// A gateway that answers with the given status.
    #[must_use]
    pub const fn with_status(status: PaymentStatus) -> Self {
        Self { status }
    }
}

impl ConfirmPayment for StubGateway {
    async fn confirm(&self, request: &ConfirmRequest) -> Result<PaymentResponse> {
        Ok(PaymentResponse {
            payment_key: request.payment_key.clone(),
            order_id: request.order_id.clone(),
            order_name: None,
            status: self.status,
            total_amount: request.amount,
            method: Some("card".to_string()),
            requested_at: None,
            approved_at: None,
            receipt: None,
        })
    }
}

/// Gateway stub that rejects every confirmation with a fixed error.
#[derive(Clone, Debug)]
pub struct FailingGateway {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl ConfirmPayment for FailingGateway {
    async fn confirm(&self, _request: &ConfirmRequest) -> Result<PaymentResponse> {
        Err(Error::Gateway {
            code: self.code.clone(),
            message: self.message.clone(),
        })
    }
}
