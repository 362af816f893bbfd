//! Prompt construction for free-form replies.

use std::fmt::Write;

use cafebot_core::{Cart, Menu};

/// Build the prompt for a message the keyword rules could not handle.
///
/// The model sees the whole menu with prices, who is asking, what they said
/// and what is already in their cart.
#[must_use]
pub fn build_prompt(menu: &Menu, customer_name: &str, message: &str, cart: &Cart) -> String {
    let mut prompt = String::from("You are CafeBot, the ordering assistant of a small café.\n\n");

    prompt.push_str("Current menu:\n");
    for category in menu.categories() {
        let _ = writeln!(prompt, "{}:", category.category);
        for item in &category.items {
            let _ = writeln!(prompt, "- {} (${})", item.name, item.price);
        }
    }

    prompt.push_str("\nCurrent cart:\n");
    if cart.is_empty() {
        prompt.push_str("(empty)\n");
    } else {
        for line in cart.lines() {
            let _ = writeln!(prompt, "- {} x{} (${})", line.name, line.quantity, line.subtotal());
        }
        let _ = writeln!(prompt, "Total: ${}", cart.total());
    }

    let _ = write!(
        prompt,
        "\nCustomer {customer_name} says: {message}\n\n\
         Respond briefly about the menu or ordering. \
         If they ask about their order status, mention their cart items. \
         If they seem to be trying to finish their order, suggest using words like \"checkout\" or \"done\"."
    );

    prompt
}

#[cfg(test)]
mod tests {
    use cafebot_core::MenuItem;

    use super::*;

    #[test]
    fn test_prompt_lists_menu_customer_and_message() {
        let prompt = build_prompt(&Menu::builtin(), "Ali", "what do you recommend?", &Cart::new());

        assert!(prompt.contains("Burger:\n- Cheese Burger ($17)"));
        assert!(prompt.contains("- Large Drink ($11)"));
        assert!(prompt.contains("Customer Ali says: what do you recommend?"));
        assert!(prompt.contains("(empty)"));
    }

    #[test]
    fn test_prompt_includes_cart() {
        let mut cart = Cart::new();
        cart.add(&MenuItem::new("Cheese Burger", 17), 2);

        let prompt = build_prompt(&Menu::builtin(), "Ali", "hi", &cart);

        assert!(prompt.contains("- Cheese Burger x2 ($34)"));
        assert!(prompt.contains("Total: $34"));
        assert!(!prompt.contains("(empty)"));
    }
}
