//! `PostgreSQL` document store.
//!
//! Each document is stored whole in a JSONB column so the shape written is
//! exactly the shape served by `/menu`. Queries are checked at runtime because
//! the schema is tiny and the server must build without a live database.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use cafebot_core::{Menu, MenuCategory, Order};

use super::{DocumentStore, RepositoryError};

/// Document store backed by `PostgreSQL` JSONB tables.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self, menu), fields(categories = menu.categories().len()))]
    async fn replace_menu(&self, menu: &Menu) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM menu_category")
            .execute(&mut *tx)
            .await?;

        for (position, category) in menu.categories().iter().enumerate() {
            let position = i32::try_from(position).map_err(|_| {
                RepositoryError::DataCorruption(format!("category position {position} out of range"))
            })?;

            sqlx::query("INSERT INTO menu_category (position, document) VALUES ($1, $2)")
                .bind(position)
                .bind(Json(category))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_menu(&self) -> Result<Menu, RepositoryError> {
        let rows: Vec<(Json<MenuCategory>,)> =
            sqlx::query_as("SELECT document FROM menu_category ORDER BY position ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(Menu::new(rows.into_iter().map(|(Json(c),)| c).collect()))
    }

    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO customer_order (order_id, document, created_at) VALUES ($1, $2, $3)",
        )
        .bind(&order.order_id)
        .bind(Json(order))
        .bind(order.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                RepositoryError::Conflict(format!("order {} already exists", order.order_id)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn find_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<(Json<Order>,)> = sqlx::query_as(
            "SELECT document FROM customer_order ORDER BY created_at ASC, order_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(Json(order),)| order).collect())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
