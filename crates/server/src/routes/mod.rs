//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Service banner
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (document store)
//!
//! # Catalog
//! POST /upload-menu              - Store the built-in catalog
//! GET  /menu                     - Stored catalog
//!
//! # Sessions
//! POST /register                 - Create or update a customer session
//! POST /chat                     - One chat turn
//! GET  /cart/{session_id}        - Current cart
//! POST /clear-cart/{session_id}  - Empty the cart
//! ```

pub mod chat;
pub mod health;
pub mod menu;
pub mod session;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Catalog
        .route("/upload-menu", post(menu::upload))
        .route("/menu", get(menu::show))
        // Sessions
        .route("/register", post(session::register))
        .route("/chat", post(chat::chat))
        .route("/cart/{session_id}", get(session::cart))
        .route("/clear-cart/{session_id}", post(session::clear_cart))
}

/// Build the complete application with middleware.
///
/// Sentry layers are added by the binary so tests can drive the router
/// without a Sentry hub.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
