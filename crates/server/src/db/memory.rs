//! In-process document store.
//!
//! Used when no database URL is configured, and by tests. Contents are lost
//! when the process exits.

use async_trait::async_trait;
use tokio::sync::RwLock;

use cafebot_core::{Menu, Order};

use super::{DocumentStore, RepositoryError};

/// Document store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<Collections>,
}

#[derive(Debug, Default)]
struct Collections {
    menu: Menu,
    orders: Vec<Order>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders stored so far.
    pub async fn order_count(&self) -> usize {
        self.collections.read().await.orders.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn replace_menu(&self, menu: &Menu) -> Result<(), RepositoryError> {
        self.collections.write().await.menu = menu.clone();
        Ok(())
    }

    async fn find_menu(&self) -> Result<Menu, RepositoryError> {
        Ok(self.collections.read().await.menu.clone())
    }

    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut collections = self.collections.write().await;
        if collections
            .orders
            .iter()
            .any(|existing| existing.order_id == order.order_id)
        {
            return Err(RepositoryError::Conflict(format!(
                "order {} already exists",
                order.order_id
            )));
        }
        collections.orders.push(order.clone());
        Ok(())
    }

    async fn find_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.collections.read().await.orders.clone())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cafebot_core::{Cart, MenuItem, OrderId};

    use super::*;

    fn order(id: &str) -> Order {
        let mut cart = Cart::new();
        cart.add(&MenuItem::new("Regular Drink", 7), 2);
        Order::from_cart(OrderId::new(id), "Ali", "0300", &cart)
    }

    #[tokio::test]
    async fn test_menu_round_trip_replaces() {
        let store = MemoryDocumentStore::new();
        assert!(store.find_menu().await.expect("find").is_empty());

        store.replace_menu(&Menu::builtin()).await.expect("replace");
        assert_eq!(store.find_menu().await.expect("find"), Menu::builtin());

        store.replace_menu(&Menu::default()).await.expect("replace");
        assert!(store.find_menu().await.expect("find").is_empty());
    }

    #[tokio::test]
    async fn test_orders_keep_insertion_order() {
        let store = MemoryDocumentStore::new();
        store.insert_order(&order("aaaa0001")).await.expect("insert");
        store.insert_order(&order("aaaa0002")).await.expect("insert");

        let ids: Vec<_> = store
            .find_orders()
            .await
            .expect("find")
            .into_iter()
            .map(|o| o.order_id.into_inner())
            .collect();
        assert_eq!(ids, ["aaaa0001", "aaaa0002"]);
    }

    #[tokio::test]
    async fn test_duplicate_order_id_conflicts() {
        let store = MemoryDocumentStore::new();
        store.insert_order(&order("dup00001")).await.expect("insert");

        let err = store.insert_order(&order("dup00001")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.order_count().await, 1);
    }
}
