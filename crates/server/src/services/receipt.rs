//! Checkout and receipt generation.

use std::fmt::Write;

use tracing::{info, instrument};

use cafebot_core::{Order, OrderId, Session};

use crate::db::{DocumentStore, RepositoryError};

/// Width of the rule lines in a receipt.
const RULE_WIDTH: usize = 30;

/// Errors that can occur at checkout.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptError {
    /// Nothing to bill.
    #[error("cart is empty")]
    EmptyCart,

    /// The order could not be persisted.
    #[error("failed to store order: {0}")]
    Store(#[from] RepositoryError),
}

/// A receipt issued for a session's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub order: Order,
    pub text: String,
    /// True when this is the previous receipt handed out again.
    pub reissued: bool,
}

/// Bills session carts and records the resulting orders.
pub struct ReceiptService<'a> {
    documents: &'a dyn DocumentStore,
}

impl<'a> ReceiptService<'a> {
    #[must_use]
    pub const fn new(documents: &'a dyn DocumentStore) -> Self {
        Self { documents }
    }

    /// Issue a receipt for the session's cart.
    ///
    /// If a receipt was already issued and the cart has not changed since,
    /// the same receipt is returned and nothing new is stored. On success the
    /// session is marked as billed; the cart itself is kept.
    ///
    /// # Errors
    ///
    /// Returns `ReceiptError::EmptyCart` for an empty cart, and
    /// `ReceiptError::Store` if the order cannot be saved. The session is left
    /// untouched in both cases.
    #[instrument(skip(self, session), fields(customer = %session.customer_name))]
    pub async fn checkout(&self, session: &mut Session) -> Result<Receipt, ReceiptError> {
        if session.cart.is_empty() {
            return Err(ReceiptError::EmptyCart);
        }

        if session.last_receipt_generated
            && let Some(order) = &session.last_order
        {
            info!(order_id = %order.order_id, "Reissuing previous receipt");
            return Ok(Receipt {
                text: format_receipt(order),
                order: order.clone(),
                reissued: true,
            });
        }

        let order = Order::from_cart(
            OrderId::generate(),
            session.customer_name.clone(),
            session.customer_phone.clone(),
            &session.cart,
        );
        self.documents.insert_order(&order).await?;

        info!(order_id = %order.order_id, total = order.total, "Order stored");

        session.last_receipt_generated = true;
        session.last_order = Some(order.clone());

        Ok(Receipt {
            text: format_receipt(&order),
            order,
            reissued: false,
        })
    }
}

/// Render an order as plain-text receipt.
#[must_use]
pub fn format_receipt(order: &Order) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut text = String::new();

    let _ = writeln!(
        text,
        "Receipt for {} ({}):",
        order.customer_name, order.customer_phone
    );
    let _ = writeln!(text, "Order ID: {}", order.order_id);
    let _ = writeln!(text, "{rule}");
    for line in &order.items {
        let _ = writeln!(
            text,
            "{} x{} = ${}",
            line.name,
            line.quantity,
            line.subtotal()
        );
    }
    let _ = writeln!(text, "{rule}");
    let _ = write!(text, "Total: ${}", order.total);

    text
}
