//! Integration test harness for CafeBot.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process HTTP tests (no external services)
//! cargo test -p cafebot-integration-tests
//!
//! # Including the PostgreSQL store tests
//! CAFEBOT_DATABASE_URL=postgres://... cargo test -p cafebot-integration-tests -- --ignored
//! ```
//!
//! [`TestApp`] builds the full router over an in-memory document store and
//! drives it with `tower::ServiceExt::oneshot`, so no port is bound.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use cafebot_core::Menu;
use cafebot_server::config::SessionConfig;
use cafebot_server::db::MemoryDocumentStore;
use cafebot_server::gemini::{GeminiError, TextGenerator, UnconfiguredGenerator};
use cafebot_server::routes;
use cafebot_server::state::AppState;

/// The application wired to in-process collaborators.
pub struct TestApp {
    pub state: AppState,
    pub documents: Arc<MemoryDocumentStore>,
    router: Router,
}

impl TestApp {
    /// App whose text generator is not configured.
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(Arc::new(UnconfiguredGenerator))
    }

    /// App using the given text generator.
    #[must_use]
    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        let documents = Arc::new(MemoryDocumentStore::new());
        let state = AppState::new(
            documents.clone(),
            generator,
            &SessionConfig::default(),
            Menu::builtin(),
        );

        Self {
            router: routes::app(state.clone()),
            state,
            documents,
        }
    }

    /// Send a request and return the status and raw body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(&self, method: Method, uri: &str, body: Option<&Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        (status, bytes.to_vec())
    }

    /// GET a JSON endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.send(Method::GET, uri, None).await;
        (status, parse(&body))
    }

    /// POST to a JSON endpoint, with an optional JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the response body is not JSON.
    pub async fn post_json(&self, uri: &str, body: Option<&Value>) -> (StatusCode, Value) {
        let (status, body) = self.send(Method::POST, uri, body).await;
        (status, parse(&body))
    }

    /// Register a customer on a session.
    pub async fn register(&self, session_id: &str, name: &str, phone: &str) -> Value {
        let body = serde_json::json!({
            "customer_name": name,
            "customer_phone": phone,
            "session_id": session_id,
        });
        self.post_json("/register", Some(&body)).await.1
    }

    /// Send one chat message.
    ///
    /// # Panics
    ///
    /// Panics if the chat endpoint does not answer 200.
    pub async fn chat(&self, session_id: &str, message: &str) -> Value {
        let body = serde_json::json!({ "message": message, "session_id": session_id });
        let (status, json) = self.post_json("/chat", Some(&body)).await;
        assert_eq!(status, StatusCode::OK, "chat failed: {json}");
        json
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        panic!(
            "Response is not JSON ({e}): {}",
            String::from_utf8_lossy(body)
        )
    })
}

/// Generator that always answers with the same text and counts calls.
#[derive(Debug, Default)]
pub struct StubGenerator {
    reply: String,
    calls: AtomicUsize,
}

impl StubGenerator {
    #[must_use]
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GeminiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Generator that always fails like an unreachable upstream.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GeminiError> {
        Err(GeminiError::Api {
            status: "UNAVAILABLE".to_string(),
            message: "The model is overloaded".to_string(),
        })
    }
}
