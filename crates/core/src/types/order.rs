//! Persisted order records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::{Cart, CartLine};
use super::id::OrderId;

/// A completed checkout.
///
/// Orders are written once when a receipt is generated and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub customer_name: String,
    pub customer_phone: String,
    /// Snapshot of the cart at checkout.
    pub items: Vec<CartLine>,
    pub total: u64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Snapshot `cart` into a new order.
    #[must_use]
    pub fn from_cart(
        order_id: OrderId,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        cart: &Cart,
    ) -> Self {
        Self {
            order_id,
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            items: cart.lines().to_vec(),
            total: cart.total(),
            created_at: Utc::now(),
        }
    }
}
