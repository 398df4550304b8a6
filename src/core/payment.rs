//! Payment confirmation flow.
//!
//! Called after the gateway redirects back from the payment window. The flow
//! re-validates the order (owner, pending status, exact amount) before the
//! gateway is contacted, so a tampered client can never confirm a charge
//! that does not match the stored order. On success the order is confirmed
//! and the ordered stock is decremented in one transaction; clearing the
//! cart afterwards is best-effort.

use crate::{
    core::cart,
    entities::{Order, OrderItem, Product, order, order_item, product},
    errors::{Error, Result},
    gateway::{ConfirmPayment, ConfirmRequest, PaymentResponse, PaymentStatus},
};
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, warn};

/// Parameters handed back by the gateway's success redirect.
#[derive(Clone, Debug)]
pub struct PaymentApproval {
    /// Payment key issued by the gateway
    pub payment_key: String,
    /// The order being paid for
    pub order_id: i64,
    /// Amount the client claims was charged
    pub amount: i64,
}

/// Confirms a pending payment and finalizes the order.
///
/// Rejects when the order does not belong to the caller, has already left
/// the pending state (re-confirmation included), or when `amount` differs
/// from the stored total. Gateway failures are surfaced with their mapped
/// message; a gateway status other than `DONE` is also a failure. On
/// success the order moves to `Confirmed` and each ordered product's stock
/// is decremented atomically, then the caller's cart is cleared on a
/// best-effort basis.
pub async fn approve_payment<G: ConfirmPayment>(
    db: &DatabaseConnection,
    gateway: &G,
    user_id: &str,
    approval: &PaymentApproval,
) -> Result<PaymentResponse> {
    if user_id.trim().is_empty() {
        return Err(Error::MissingIdentity);
    }

    let order = Order::find_by_id(approval.order_id)
        .filter(order::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound {
            id: approval.order_id,
        })?;

    if !order
        .status
        .can_transition_to(order::OrderStatus::Confirmed)
    {
        return Err(Error::OrderNotPending {
            status: order.status,
        });
    }

    // Amount check guards against a tampered success redirect.
    if order.total_amount != approval.amount {
        return Err(Error::AmountMismatch {
            expected: order.total_amount,
            reported: approval.amount,
        });
    }

    let payment = gateway
        .confirm(&ConfirmRequest {
            payment_key: approval.payment_key.clone(),
            order_id: order.id.to_string(),
            amount: approval.amount,
        })
        .await?;

    if payment.status != PaymentStatus::Done {
        return Err(Error::PaymentIncomplete {
            status: payment.status.to_string(),
        });
    }

    // Confirm the order and take the sold stock in one transaction.
    let txn = db.begin().await?;

    let items = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order.id))
        .all(&txn)
        .await?;

    let order_id = order.id;
    let mut active: order::ActiveModel = order.into();
    active.status = Set(order::OrderStatus::Confirmed);
    active.updated_at = Set(chrono::Utc::now());
    active.update(&txn).await?;

    for item in &items {
        Product::update_many()
            .col_expr(
                product::Column::StockQuantity,
                Expr::col(product::Column::StockQuantity).sub(item.quantity),
            )
            .filter(product::Column::Id.eq(item.product_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    info!(order_id, amount = approval.amount, "payment confirmed");

    // A stale cart must not undo a completed payment.
    if let Err(e) = cart::clear_cart(db, user_id).await {
        warn!(order_id, "failed to clear cart after payment: {e}");
    }

    Ok(payment)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{cart, order as order_core, product as product_core},
        entities::order::OrderStatus,
        test_utils::{
            FailingGateway, StubGateway, create_custom_product, insert_test_order, setup_test_db,
            test_address,
        },
    };

    const USER: &str = "user_1";
    const OTHER_USER: &str = "user_2";

    fn approval_for(order: &crate::entities::order::Model) -> PaymentApproval {
        PaymentApproval {
            payment_key: "pay_key_123".to_string(),
            order_id: order.id,
            amount: order.total_amount,
        }
    }

    #[tokio::test]
    async fn test_approve_payment_requires_identity() -> Result<()> {
        let db = setup_test_db().await?;
        let gateway = StubGateway::done();

        let approval = PaymentApproval {
            payment_key: "k".to_string(),
            order_id: 1,
            amount: 1_000,
        };
        let result = approve_payment(&db, &gateway, "", &approval).await;
        assert!(matches!(result.unwrap_err(), Error::MissingIdentity));

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_payment_rejects_unknown_or_foreign_order() -> Result<()> {
        let db = setup_test_db().await?;
        let gateway = StubGateway::done();

        let order = insert_test_order(&db, OTHER_USER, 10_000, OrderStatus::Pending).await?;

        let result = approve_payment(&db, &gateway, USER, &approval_for(&order)).await;
        assert!(matches!(result.unwrap_err(), Error::OrderNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_payment_rejects_non_pending_order() -> Result<()> {
        let db = setup_test_db().await?;
        let gateway = StubGateway::done();

        // Re-confirmation is an idempotent-reject, never an idempotent-success
        let confirmed = insert_test_order(&db, USER, 10_000, OrderStatus::Confirmed).await?;
        let result = approve_payment(&db, &gateway, USER, &approval_for(&confirmed)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::OrderNotPending {
                status: OrderStatus::Confirmed
            }
        ));

        let cancelled = insert_test_order(&db, USER, 10_000, OrderStatus::Cancelled).await?;
        let result = approve_payment(&db, &gateway, USER, &approval_for(&cancelled)).await;
        assert!(matches!(result.unwrap_err(), Error::OrderNotPending { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_payment_rejects_amount_mismatch() -> Result<()> {
        let db = setup_test_db().await?;
        let gateway = StubGateway::done();

        let order = insert_test_order(&db, USER, 43_000, OrderStatus::Pending).await?;

        let mut approval = approval_for(&order);
        approval.amount = 42_000;
        let result = approve_payment(&db, &gateway, USER, &approval).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::AmountMismatch {
                expected: 43_000,
                reported: 42_000
            }
        ));

        // The order stays pending
        let reloaded = order_core::get_order(&db, USER, order.id).await?;
        assert_eq!(reloaded.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_payment_worked_example() -> Result<()> {
        let db = setup_test_db().await?;
        let gateway = StubGateway::done();

        // Product P (price 20,000, stock 3) at quantity 2 -> total 43,000
        let product = create_custom_product(&db, "P", 20_000, 3, None, true).await?;
        let line = cart::add_to_cart(&db, USER, product.id, 2).await?;
        let order = order_core::create_order(&db, USER, &[line.id], test_address(), None).await?;
        assert_eq!(order.total_amount, 43_000);

        let payment = approve_payment(&db, &gateway, USER, &approval_for(&order)).await?;
        assert_eq!(payment.status, PaymentStatus::Done);
        assert_eq!(payment.order_id, order.id.to_string());

        // Order confirmed, stock taken, cart emptied
        let reloaded = order_core::get_order(&db, USER, order.id).await?;
        assert_eq!(reloaded.status, OrderStatus::Confirmed);

        let product = product_core::get_product_by_id(&db, product.id).await?.unwrap();
        assert_eq!(product.stock_quantity, 1);

        assert_eq!(cart::get_cart_count(&db, USER).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_payment_rejects_incomplete_gateway_status() -> Result<()> {
        let db = setup_test_db().await?;
        let gateway = StubGateway::with_status(PaymentStatus::Aborted);

        let order = insert_test_order(&db, USER, 10_000, OrderStatus::Pending).await?;

        let result = approve_payment(&db, &gateway, USER, &approval_for(&order)).await;
        match result.unwrap_err() {
            Error::PaymentIncomplete { status } => assert_eq!(status, "ABORTED"),
            other => panic!("unexpected error: {other}"),
        }

        let reloaded = order_core::get_order(&db, USER, order.id).await?;
        assert_eq!(reloaded.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_payment_surfaces_gateway_failure_verbatim() -> Result<()> {
        let db = setup_test_db().await?;
        let gateway = FailingGateway {
            code: "INVALID_REJECT_CARD".to_string(),
            message: "the card was declined".to_string(),
        };

        let order = insert_test_order(&db, USER, 10_000, OrderStatus::Pending).await?;

        let result = approve_payment(&db, &gateway, USER, &approval_for(&order)).await;
        match result.unwrap_err() {
            Error::Gateway { code, message } => {
                assert_eq!(code, "INVALID_REJECT_CARD");
                assert_eq!(message, "the card was declined");
            }
            other => panic!("unexpected error: {other}"),
        }

        // No state was touched
        let reloaded = order_core::get_order(&db, USER, order.id).await?;
        assert_eq!(reloaded.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_payment_only_clears_callers_cart() -> Result<()> {
        let db = setup_test_db().await?;
        let gateway = StubGateway::done();

        let product = create_custom_product(&db, "Mug", 8_000, 10, None, true).await?;
        let line = cart::add_to_cart(&db, USER, product.id, 1).await?;
        cart::add_to_cart(&db, OTHER_USER, product.id, 2).await?;

        let order = order_core::create_order(&db, USER, &[line.id], test_address(), None).await?;
        approve_payment(&db, &gateway, USER, &approval_for(&order)).await?;

        assert_eq!(cart::get_cart_count(&db, USER).await?, 0);
        assert_eq!(cart::get_cart_count(&db, OTHER_USER).await?, 1);

        Ok(())
    }
}
