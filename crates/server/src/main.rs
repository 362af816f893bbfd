//! CafeBot server - conversational ordering backend.
//!
//! Serves the chat API on port 8000 by default.
//!
//! # Architecture
//!
//! - Axum web framework with a JSON API
//! - `PostgreSQL` (JSONB documents) for the catalog and orders, or an
//!   in-memory store when no database is configured
//! - Google Gemini for replies outside the ordering rules
//! - Sessions held in memory, bounded and optionally expiring

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use cafebot_core::Menu;
use cafebot_server::config::CafebotConfig;
use cafebot_server::db::{self, DocumentStore, MemoryDocumentStore, PgDocumentStore};
use cafebot_server::gemini::{GeminiClient, TextGenerator, UnconfiguredGenerator};
use cafebot_server::routes;
use cafebot_server::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CafebotConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Pick the document store from configuration.
async fn init_documents(config: &CafebotConfig) -> Arc<dyn DocumentStore> {
    match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");
            Arc::new(PgDocumentStore::new(pool))
        }
        None => {
            tracing::warn!("No database configured, orders will not survive a restart");
            Arc::new(MemoryDocumentStore::new())
        }
    }
}

/// Pick the text generator from configuration.
fn init_generator(config: &CafebotConfig) -> Arc<dyn TextGenerator> {
    match &config.gemini {
        Some(gemini) => {
            let client = GeminiClient::new(gemini).expect("Failed to create Gemini client");
            tracing::info!(model = client.model(), "Gemini client created");
            Arc::new(client)
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set, free-form questions get a fallback reply");
            Arc::new(UnconfiguredGenerator)
        }
    }
}

/// Load the stored catalog, falling back to the built-in one.
async fn load_menu(documents: &dyn DocumentStore) -> Menu {
    match documents.find_menu().await {
        Ok(menu) if menu.is_empty() => {
            tracing::info!("No stored menu, using built-in catalog");
            Menu::builtin()
        }
        Ok(menu) => match menu.validate() {
            Ok(()) => {
                tracing::info!(categories = menu.categories().len(), "Stored menu loaded");
                menu
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored menu is invalid, using built-in catalog");
                Menu::builtin()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load stored menu, using built-in catalog");
            Menu::builtin()
        }
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = CafebotConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cafebot_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p cafebot-cli -- migrate
    let documents = init_documents(&config).await;
    let generator = init_generator(&config);
    let menu = load_menu(documents.as_ref()).await;

    let state = AppState::new(documents, generator, &config.sessions, menu);

    let app = routes::app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("cafebot listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
