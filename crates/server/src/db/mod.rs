//! Document storage for the menu catalog and completed orders.
//!
//! # Collections
//!
//! - `menu_category` - One JSONB document per catalog category, kept in order
//! - `customer_order` - One JSONB document per order, keyed by order ID
//!
//! Two backends implement [`DocumentStore`]: [`PgDocumentStore`] for
//! `PostgreSQL` and [`MemoryDocumentStore`] for development and tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p cafebot-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use cafebot_core::{Menu, Order};

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate order ID).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence for the catalog and orders.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Replace the whole stored catalog.
    async fn replace_menu(&self, menu: &Menu) -> Result<(), RepositoryError>;

    /// Read the stored catalog, in its original category order.
    async fn find_menu(&self) -> Result<Menu, RepositoryError>;

    /// Persist a new order.
    ///
    /// Returns `RepositoryError::Conflict` if the order ID is already taken.
    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError>;

    /// Read all orders, oldest first.
    async fn find_orders(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
