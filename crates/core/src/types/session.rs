//! Per-customer conversation state.

use serde::{Deserialize, Serialize};

use super::cart::Cart;
use super::order::Order;

/// Name used for sessions that chat before registering.
pub const DEFAULT_CUSTOMER_NAME: &str = "Guest";

/// Phone used for sessions that chat before registering.
pub const DEFAULT_CUSTOMER_PHONE: &str = "Unknown";

/// Server-side state for one customer's chat and cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub customer_name: String,
    pub customer_phone: String,
    pub cart: Cart,
    /// True once a receipt has been issued for the current cart contents.
    pub last_receipt_generated: bool,
    /// The order behind the most recent receipt.
    pub last_order: Option<Order>,
}

impl Session {
    /// A fresh session for a registered customer.
    #[must_use]
    pub fn new(customer_name: impl Into<String>, customer_phone: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            cart: Cart::new(),
            last_receipt_generated: false,
            last_order: None,
        }
    }

    /// A fresh session for an unregistered customer.
    #[must_use]
    pub fn guest() -> Self {
        Self::new(DEFAULT_CUSTOMER_NAME, DEFAULT_CUSTOMER_PHONE)
    }

    /// Empty the cart. The session and customer details are kept.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.last_receipt_generated = false;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::guest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::menu::MenuItem;

    #[test]
    fn test_guest_defaults() {
        let session = Session::guest();
        assert_eq!(session.customer_name, "Guest");
        assert_eq!(session.customer_phone, "Unknown");
        assert!(session.cart.is_empty());
        assert!(!session.last_receipt_generated);
    }

    #[test]
    fn test_clear_cart_resets_receipt_flag() {
        let mut session = Session::new("Ali", "0300");
        session.cart.add(&MenuItem::new("Cheese Burger", 17), 1);
        session.last_receipt_generated = true;

        session.clear_cart();

        assert!(session.cart.is_empty());
        assert!(!session.last_receipt_generated);
        assert_eq!(session.customer_name, "Ali");
    }
}
