//! CLI subcommands.

pub mod menu;
pub mod migrate;
pub mod orders;

use secrecy::SecretString;
use sqlx::PgPool;

use cafebot_server::config::database_url_from_env;
use cafebot_server::db::{PgDocumentStore, create_pool};

/// Errors shared by the database-backed commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing environment variable: CAFEBOT_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn database_url() -> Result<SecretString, CommandError> {
    database_url_from_env().ok_or(CommandError::MissingDatabaseUrl)
}

/// Connect to the configured database.
pub async fn connect() -> Result<PgPool, CommandError> {
    let url = database_url()?;
    tracing::info!("Connecting to database...");
    Ok(create_pool(&url).await?)
}

/// Connect and wrap the pool in a document store.
pub async fn document_store() -> Result<PgDocumentStore, CommandError> {
    Ok(PgDocumentStore::new(connect().await?))
}
