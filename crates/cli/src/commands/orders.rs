//! Order inspection commands.

use cafebot_core::Order;
use cafebot_server::db::DocumentStore;

use super::document_store;

/// Print every stored order, oldest first.
///
/// # Errors
///
/// Returns an error if the database read fails.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let store = document_store().await?;
    let orders = store.find_orders().await?;

    #[allow(clippy::print_stdout)]
    {
        if orders.is_empty() {
            println!("No orders yet.");
        }
        for order in &orders {
            println!("{}", summary_line(order));
        }
    }
    Ok(())
}

fn summary_line(order: &Order) -> String {
    let items: u64 = order.items.iter().map(|line| u64::from(line.quantity)).sum();
    format!(
        "{}  {}  {} ({})  {} item(s)  ${}",
        order.order_id,
        order.created_at.format("%Y-%m-%d %H:%M"),
        order.customer_name,
        order.customer_phone,
        items,
        order.total
    )
}

#[cfg(test)]
mod tests {
    use cafebot_core::{Cart, MenuItem, OrderId};

    use super::*;

    #[test]
    fn test_summary_line() {
        let mut cart = Cart::new();
        cart.add(&MenuItem::new("Cheese Burger", 17), 2);
        cart.add(&MenuItem::new("Regular Fries", 9), 1);
        let order = Order::from_cart(OrderId::new("abcd1234"), "Ali", "0300", &cart);

        let line = summary_line(&order);

        assert!(line.starts_with("abcd1234  "));
        assert!(line.ends_with("Ali (0300)  3 item(s)  $43"));
    }
}
