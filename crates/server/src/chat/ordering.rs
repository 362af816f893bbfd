//! Applies an order message to a session cart.

use tracing::debug;

use cafebot_core::{Menu, MenuItem, Session};

use super::parser::{ParsedItem, parse_message};

pub const ITEMS_ADDED_REPLY: &str = "Items added to your cart! Would you like anything else?";
pub const NOTHING_RECOGNISED_REPLY: &str = "I couldn't recognize any menu items in your request.";

/// What an order turn did to the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderOutcome {
    /// Menu item names added, with the quantity added this turn.
    pub added: Vec<(String, u32)>,
    /// Phrases that matched no menu item.
    pub unmatched: Vec<String>,
}

impl OrderOutcome {
    /// Whether at least one item went into the cart.
    #[must_use]
    pub fn any_added(&self) -> bool {
        !self.added.is_empty()
    }

    /// Customer-facing confirmation.
    #[must_use]
    pub fn reply(&self) -> &'static str {
        if self.any_added() {
            ITEMS_ADDED_REPLY
        } else {
            NOTHING_RECOGNISED_REPLY
        }
    }
}

/// Parse a normalized message and merge every recognised item into the cart.
///
/// Unrecognised phrases are skipped. Items added before a miss stay in the
/// cart. The session's receipt flag is always reset.
pub fn apply_order(menu: &Menu, session: &mut Session, normalized: &str) -> OrderOutcome {
    session.last_receipt_generated = false;

    let mut outcome = OrderOutcome::default();
    for ParsedItem { phrase, quantity } in parse_message(normalized) {
        match lookup(menu, &phrase) {
            Some(item) => {
                session.cart.add(item, quantity);
                outcome.added.push((item.name.clone(), quantity));
            }
            None => {
                debug!(phrase = %phrase, "No menu item matches phrase");
                outcome.unmatched.push(phrase);
            }
        }
    }
    outcome
}

/// Find a menu item, retrying once with a trailing "s" removed.
fn lookup<'m>(menu: &'m Menu, phrase: &str) -> Option<&'m MenuItem> {
    menu.find_item(phrase).or_else(|| {
        phrase
            .strip_suffix('s')
            .and_then(|singular| menu.find_item(singular))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantities(session: &Session) -> Vec<(&str, u32)> {
        session
            .cart
            .lines()
            .iter()
            .map(|line| (line.name.as_str(), line.quantity))
            .collect()
    }

    #[test]
    fn test_order_adds_matched_items() {
        let menu = Menu::builtin();
        let mut session = Session::new("Ali", "0300");

        let outcome = apply_order(&menu, &mut session, "i want 2 cheese burger and fries");

        assert!(outcome.any_added());
        assert_eq!(outcome.reply(), ITEMS_ADDED_REPLY);
        assert_eq!(
            quantities(&session),
            [("Cheese Burger", 2), ("Regular Fries", 1)]
        );
        assert_eq!(session.cart.total(), 43);
    }

    #[test]
    fn test_repeat_orders_merge_lines() {
        let menu = Menu::builtin();
        let mut session = Session::guest();

        apply_order(&menu, &mut session, "large drink and large drink");
        apply_order(&menu, &mut session, "large drink x3");

        assert_eq!(quantities(&session), [("Large Drink", 5)]);
    }

    #[test]
    fn test_plural_phrase_retries_singular() {
        let menu = Menu::builtin();
        let mut session = Session::guest();

        let outcome = apply_order(&menu, &mut session, "2 cheese burgers and 3 drinks");

        assert!(outcome.unmatched.is_empty());
        assert_eq!(
            quantities(&session),
            [("Cheese Burger", 2), ("Regular Drink", 3)]
        );
    }

    #[test]
    fn test_unmatched_items_are_skipped() {
        let menu = Menu::builtin();
        let mut session = Session::guest();

        let outcome = apply_order(&menu, &mut session, "cheeseburger x3 and fries");

        assert_eq!(outcome.unmatched, ["cheeseburger"]);
        assert_eq!(quantities(&session), [("Regular Fries", 1)]);
    }

    #[test]
    fn test_nothing_recognised() {
        let menu = Menu::builtin();
        let mut session = Session::guest();

        let outcome = apply_order(&menu, &mut session, "i want pizza");

        assert!(!outcome.any_added());
        assert_eq!(outcome.reply(), NOTHING_RECOGNISED_REPLY);
        assert!(session.cart.is_empty());
    }

    #[test]
    fn test_order_resets_receipt_flag() {
        let menu = Menu::builtin();
        let mut session = Session::guest();
        session.last_receipt_generated = true;

        apply_order(&menu, &mut session, "i want pizza");

        assert!(!session.last_receipt_generated);
    }
}
