//! Session carts.
//!
//! A cart holds at most one line per item name. Adding an item that is
//! already present increments that line's quantity in place, so the line
//! order reflects when each item was first added.

use serde::{Deserialize, Serialize};

use super::menu::MenuItem;

/// One catalog item and how many of it were ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub name: String,
    /// Unit price captured when the line was created.
    pub price: u32,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        u64::from(self.price) * u64::from(self.quantity)
    }
}

/// An ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` of `item`, merging with an existing line of the same name.
    ///
    /// A zero quantity is ignored. Quantities saturate rather than overflow.
    pub fn add(&mut self, item: &MenuItem, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.name == item.name) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                name: item.name.clone(),
                price: item.price,
                quantity,
            });
        }
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burger() -> MenuItem {
        MenuItem::new("Cheese Burger", 17)
    }

    fn fries() -> MenuItem {
        MenuItem::new("Regular Fries", 9)
    }

    #[test]
    fn test_add_appends_new_lines_in_order() {
        let mut cart = Cart::new();
        cart.add(&burger(), 2);
        cart.add(&fries(), 1);

        let names: Vec<_> = cart.lines().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Cheese Burger", "Regular Fries"]);
    }

    #[test]
    fn test_add_same_item_merges_quantity() {
        let mut cart = Cart::new();
        cart.add(&burger(), 2);
        cart.add(&fries(), 1);
        cart.add(&burger(), 3);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        let mut cart = Cart::new();
        cart.add(&burger(), 2);
        cart.add(&fries(), 1);

        assert_eq!(cart.total(), 2 * 17 + 9);
        assert_eq!(
            cart.total(),
            cart.lines().iter().map(|l| u64::from(l.price) * u64::from(l.quantity)).sum::<u64>()
        );
    }

    #[test]
    fn test_zero_quantity_is_ignored() {
        let mut cart = Cart::new();
        cart.add(&burger(), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_saturates() {
        let mut cart = Cart::new();
        cart.add(&burger(), u32::MAX);
        cart.add(&burger(), 1);
        assert_eq!(cart.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(&burger(), 1);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0);
    }

    #[test]
    fn test_cart_serializes_as_line_list() {
        let mut cart = Cart::new();
        cart.add(&fries(), 2);
        let json = serde_json::to_value(&cart).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!([{"name": "Regular Fries", "price": 9, "quantity": 2}])
        );
    }
}
