//! Core business logic - framework-agnostic storefront operations.
//!
//! Every function takes the database connection and the caller identity
//! explicitly, making the flows directly testable without a request context.

/// Cart line management (add, list, update, remove, clear)
pub mod cart;
/// Order creation, lookup, and paginated history
pub mod order;
/// Payment confirmation flow against the gateway
pub mod payment;
/// Product catalog read paths
pub mod product;
/// Shipping fee policy
pub mod shipping;
