//! The café catalog: categories of items with integer prices.
//!
//! Lookup is deliberately simple: the first item (in declaration order) whose
//! name contains the fragment, ignoring case, wins. Ambiguous fragments such
//! as "fries" therefore resolve to whichever matching item is declared first,
//! which is why the built-in catalog lists sizes smallest first.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single orderable item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuItem {
    /// Display name, also the key used to merge cart lines.
    pub name: String,
    /// Unit price in whole currency units.
    pub price: u32,
}

impl MenuItem {
    /// Create a new menu item.
    #[must_use]
    pub fn new(name: impl Into<String>, price: u32) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// A named group of items, e.g. "Burger".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub category: String,
    pub items: Vec<MenuItem>,
}

/// Problems found when validating a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("menu has no categories")]
    Empty,
    #[error("category {0:?} has no items")]
    EmptyCategory(String),
    #[error("item name is blank in category {0:?}")]
    BlankItemName(String),
    #[error("item {0:?} appears more than once")]
    DuplicateItem(String),
    #[error("item {0:?} has a zero price")]
    ZeroPrice(String),
}

/// The full catalog, an ordered sequence of categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Menu {
    categories: Vec<MenuCategory>,
}

impl Menu {
    /// Create a menu from categories, keeping their order.
    #[must_use]
    pub const fn new(categories: Vec<MenuCategory>) -> Self {
        Self { categories }
    }

    /// The built-in café catalog.
    #[must_use]
    pub fn builtin() -> Self {
        fn category(name: &str, items: &[(&str, u32)]) -> MenuCategory {
            MenuCategory {
                category: name.to_string(),
                items: items
                    .iter()
                    .map(|&(item, price)| MenuItem::new(item, price))
                    .collect(),
            }
        }

        Self::new(vec![
            category(
                "Burger",
                &[
                    ("Cheese Burger", 17),
                    ("Spicy Jalapeño", 20),
                    ("Smoky BBQ", 19),
                    ("Non-Cheese Burger", 16),
                    ("Garlic Mushroom", 19),
                    ("Avocado Ranch", 20),
                    ("Chicken Burger", 18),
                    ("Buffalo Heat", 20),
                    ("Honey Mustard Glaze", 20),
                    ("Beef Burger", 19),
                    ("Bacon Jam Bliss", 20),
                    ("Truffle Deluxe", 20),
                ],
            ),
            category(
                "Fries",
                &[
                    ("Regular Fries", 9),
                    ("Medium Fries", 11),
                    ("Large Fries", 13),
                ],
            ),
            category(
                "Drinks",
                &[
                    ("Regular Drink", 7),
                    ("Medium Drink", 9),
                    ("Large Drink", 11),
                ],
            ),
        ])
    }

    /// Categories in declaration order.
    #[must_use]
    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    /// All items, category by category, in declaration order.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Find the first item whose name contains `fragment`, ignoring case.
    ///
    /// Blank fragments never match.
    #[must_use]
    pub fn find_item(&self, fragment: &str) -> Option<&MenuItem> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.items()
            .find(|item| item.name.to_lowercase().contains(&needle))
    }

    /// Check that the catalog is usable for ordering.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: an empty catalog or category, a blank
    /// or duplicated item name, or a zero price.
    pub fn validate(&self) -> Result<(), MenuError> {
        if self.categories.is_empty() {
            return Err(MenuError::Empty);
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.items.is_empty() {
                return Err(MenuError::EmptyCategory(category.category.clone()));
            }
            for item in &category.items {
                if item.name.trim().is_empty() {
                    return Err(MenuError::BlankItemName(category.category.clone()));
                }
                if !seen.insert(item.name.to_lowercase()) {
                    return Err(MenuError::DuplicateItem(item.name.clone()));
                }
                if item.price == 0 {
                    return Err(MenuError::ZeroPrice(item.name.clone()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(menu: &Menu, fragment: &str) -> Option<String> {
        menu.find_item(fragment).map(|item| item.name.clone())
    }

    #[test]
    fn test_builtin_menu_is_valid() {
        assert_eq!(Menu::builtin().validate(), Ok(()));
    }

    #[test]
    fn test_builtin_menu_shape() {
        let menu = Menu::builtin();
        let names: Vec<_> = menu.categories().iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, ["Burger", "Fries", "Drinks"]);
        assert_eq!(menu.items().count(), 18);
    }

    #[test]
    fn test_find_item_is_case_insensitive() {
        let menu = Menu::builtin();
        assert_eq!(found(&menu, "CHEESE burger").as_deref(), Some("Cheese Burger"));
        assert_eq!(found(&menu, "smoky bbq").as_deref(), Some("Smoky BBQ"));
    }

    #[test]
    fn test_find_item_first_match_wins() {
        let menu = Menu::builtin();
        // "fries" is contained in all three sizes; the first declared wins.
        assert_eq!(found(&menu, "fries").as_deref(), Some("Regular Fries"));
        assert_eq!(found(&menu, "drink").as_deref(), Some("Regular Drink"));
        // "burger" matches Cheese Burger before Non-Cheese Burger.
        assert_eq!(found(&menu, "burger").as_deref(), Some("Cheese Burger"));
        // A single letter matches the first item containing it anywhere.
        assert_eq!(found(&menu, "a").as_deref(), Some("Spicy Jalapeño"));
    }

    #[test]
    fn test_find_item_specific_sizes() {
        let menu = Menu::builtin();
        assert_eq!(found(&menu, "large fries").as_deref(), Some("Large Fries"));
        assert_eq!(found(&menu, "medium drink").as_deref(), Some("Medium Drink"));
    }

    #[test]
    fn test_find_item_non_ascii() {
        let menu = Menu::builtin();
        assert_eq!(found(&menu, "jalapeño").as_deref(), Some("Spicy Jalapeño"));
    }

    #[test]
    fn test_find_item_misses() {
        let menu = Menu::builtin();
        assert_eq!(found(&menu, "pizza"), None);
        assert_eq!(found(&menu, "cheeseburger"), None);
        assert_eq!(found(&menu, ""), None);
        assert_eq!(found(&menu, "   "), None);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let menu = Menu::new(vec![MenuCategory {
            category: "Burger".to_string(),
            items: vec![MenuItem::new("Cheese Burger", 17), MenuItem::new("cheese burger", 18)],
        }]);
        assert_eq!(
            menu.validate(),
            Err(MenuError::DuplicateItem("cheese burger".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_empty_and_zero_price() {
        assert_eq!(Menu::default().validate(), Err(MenuError::Empty));

        let menu = Menu::new(vec![MenuCategory {
            category: "Drinks".to_string(),
            items: vec![MenuItem::new("Water", 0)],
        }]);
        assert_eq!(menu.validate(), Err(MenuError::ZeroPrice("Water".to_string())));
    }

    #[test]
    fn test_menu_serializes_as_category_list() {
        let json = serde_json::to_value(Menu::builtin()).expect("serialize");
        let first = &json[0];
        assert_eq!(first["category"], "Burger");
        assert_eq!(first["items"][0]["name"], "Cheese Burger");
        assert_eq!(first["items"][0]["price"], 17);
    }
}
