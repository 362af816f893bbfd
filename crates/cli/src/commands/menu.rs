//! Menu management commands.
//!
//! A YAML catalog is a list of categories, in the same shape `/menu` serves:
//!
//! ```yaml
//! - category: Burger
//!   items:
//!     - name: Cheese Burger
//!       price: 17
//! ```

use std::path::Path;

use tracing::info;

use cafebot_core::Menu;
use cafebot_server::db::DocumentStore;

use super::document_store;

/// Store the built-in catalog, or the one in `file`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the catalog is
/// invalid, or the database write fails.
pub async fn upload(file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let menu = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading menu from file");
            let content = tokio::fs::read_to_string(path).await?;
            parse_menu(&content)?
        }
        None => Menu::builtin(),
    };
    menu.validate()?;

    let store = document_store().await?;
    store.replace_menu(&menu).await?;

    info!(
        categories = menu.categories().len(),
        items = menu.items().count(),
        "Menu uploaded"
    );
    Ok(())
}

/// Print the stored catalog.
///
/// # Errors
///
/// Returns an error if the database read fails.
pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let store = document_store().await?;
    let menu = store.find_menu().await?;

    #[allow(clippy::print_stdout)]
    {
        if menu.is_empty() {
            println!("No menu stored. Run `cafebot menu upload` first.");
        }
        for category in menu.categories() {
            println!("{}", category.category);
            for item in &category.items {
                println!("  {:<24} ${}", item.name, item.price);
            }
        }
    }
    Ok(())
}

fn parse_menu(yaml: &str) -> Result<Menu, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}
