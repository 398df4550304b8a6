//! Unified error type for the storefront core.
//!
//! Every operation returns [`Result`]. Variants carry the offending values so
//! display strings stay human-readable at the boundary without a separate
//! message table.

use crate::entities::order::OrderStatus;
use thiserror::Error;

/// All failure modes surfaced by the storefront core.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration is missing or unparseable (env vars, config.toml).
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    /// The caller identity is blank. Sign-in happens upstream; the core only
    /// ever receives an already-resolved user id.
    #[error("Sign-in is required")]
    MissingIdentity,

    /// Generic input validation failure (address fields, order note, ...).
    #[error("Validation error: {message}")]
    Validation {
        /// Which input was rejected and why
        message: String,
    },

    /// A quantity below 1 was requested.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i32,
    },

    /// No product row with this id, or the row is not visible to the caller.
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Product primary key
        id: i64,
    },

    /// The product exists but is no longer for sale.
    #[error("{name} is no longer available for sale")]
    ProductInactive {
        /// Product name at lookup time
        name: String,
    },

    /// The requested quantity exceeds the live stock of a product.
    #[error("Insufficient stock for {name} (available: {available})")]
    InsufficientStock {
        /// Product name at lookup time
        name: String,
        /// Stock currently recorded for the product
        available: i32,
    },

    /// No cart line with this id belongs to the caller.
    #[error("Cart item not found: {id}")]
    CartItemNotFound {
        /// Cart line primary key
        id: i64,
    },

    /// An order operation was invoked with an empty cart-line selection.
    #[error("No cart items were selected")]
    EmptySelection,

    /// No order with this id belongs to the caller.
    #[error("Order not found: {id}")]
    OrderNotFound {
        /// Order primary key
        id: i64,
    },

    /// Payment confirmation was attempted on an order that already left the
    /// pending state. Re-confirming is rejected, not treated as success.
    #[error("Order has already been processed (status: {status})")]
    OrderNotPending {
        /// The order's current status
        status: OrderStatus,
    },

    /// The reported charge amount does not equal the stored order total.
    #[error("Payment amount mismatch (expected {expected}, reported {reported})")]
    AmountMismatch {
        /// Total persisted on the order
        expected: i64,
        /// Amount claimed by the caller
        reported: i64,
    },

    /// The payment gateway rejected the confirmation call.
    #[error("Payment gateway error [{code}]: {message}")]
    Gateway {
        /// Machine-readable gateway error code
        code: String,
        /// Human-readable message (mapped locally when the code is known)
        message: String,
    },

    /// The gateway answered but the payment did not reach the DONE state.
    #[error("Payment was not completed (status: {status})")]
    PaymentIncomplete {
        /// Status string reported by the gateway
        status: String,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Transport-level failure while calling the payment gateway.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (catalog seed file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

// Convenience `Result` type
#[allow(missing_docs)]
pub type Result<T> = std::result::Result<T, Error>;
